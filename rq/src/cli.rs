//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ReqMind - document-grounded requirement analysis
#[derive(Parser)]
#[command(name = "rq", about = "Analyze requirements against a document corpus", version)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a requirement: checklist, per-item outcomes, summary
    Analyze {
        /// The requirement to analyze
        requirement: String,
    },

    /// Generate the review checklist without executing it
    Plan {
        /// The requirement to plan for
        requirement: String,
    },

    /// Plan, then execute the checklist through the work/judge/verify loop
    Orchestrate {
        /// The requirement to run
        requirement: String,
    },
}
