//! CLI argument parsing for docstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ds")]
#[command(author, version, about = "Module/document corpus store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reload the corpus from a directory tree (clears existing documents)
    Import {
        /// Corpus root: one subdirectory per module, one .md file per document
        #[arg(required = true)]
        path: PathBuf,
    },

    /// List all modules
    Modules,

    /// List the files of a module
    Files {
        /// Module name
        #[arg(required = true)]
        module: String,
    },

    /// Print a document's content by file name
    Show {
        /// Document file name (without extension)
        #[arg(required = true)]
        file_name: String,
    },

    /// Show corpus statistics
    Stats,
}
