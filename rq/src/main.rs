//! ReqMind CLI entry point

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::info;

use reqmind::cli::{Cli, Command};
use reqmind::config::Config;
use reqmind::events::EventBus;
use reqmind::llm::create_client;
use reqmind::r#loop::LoopOutcome;
use reqmind::session::AnalysisSession;
use reqmind::tools::SqliteDocumentSource;

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    let level = match cli_log_level.map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let source = SqliteDocumentSource::open(&config.storage.db_path)?;

    let bus = EventBus::with_default_capacity();
    let mut events = bus.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            println!("{}", event.render());
        }
    });

    let session = AnalysisSession::new(config, llm, source);
    let session = {
        let emitter = bus.emitter_for(session.session_id().to_string());
        session.with_emitter(emitter)
    };

    info!(session_id = %session.session_id(), "rq starting");

    match cli.command {
        Command::Analyze { requirement } => {
            let report = session.run(&requirement).await?;

            println!();
            println!("{}", "Target documents".bold());
            if report.targets.is_empty() {
                println!("  (none)");
            } else {
                for target in &report.targets {
                    println!("  {} {}", "•".green(), target);
                }
            }
            println!();
            println!("{}", "Summary".bold());
            println!("{}", report.summary);
        }
        Command::Plan { requirement } => {
            let checklist = session.plan(&requirement).await?;
            println!("{}", checklist);
        }
        Command::Orchestrate { requirement } => {
            let result = session.orchestrate(&requirement).await?;

            println!("{}", result.checklist);
            match result.outcome {
                LoopOutcome::Exited { passes } => {
                    println!("{} Completed in {} pass(es)", "✓".green(), passes);
                }
                LoopOutcome::CapReached { passes } => {
                    println!("{} Stopped at the {}-pass cap with open items", "⚠".yellow(), passes);
                }
            }
        }
    }

    // Dropping every sender lets the printer drain buffered events and exit
    drop(session);
    drop(bus);
    let _ = printer.await;

    Ok(())
}
