use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use docstore::cli::{Cli, Command};
use docstore::config::Config;
use docstore::{DocumentStore, scan_corpus_dir};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("docstore starting");

    match cli.command {
        Command::Import { path } => {
            let store = DocumentStore::open(&config.db_path)?;
            let (records, stats) = scan_corpus_dir(&path)?;
            store.replace_all(&records)?;
            println!(
                "{} Imported {} documents across {} modules ({} empty)",
                "✓".green(),
                stats.documents,
                stats.modules,
                stats.empty_modules
            );
        }
        Command::Modules => {
            let store = DocumentStore::open(&config.db_path)?;
            let modules = store.list_modules()?;
            if modules.is_empty() {
                println!("No modules found");
            } else {
                for module in modules {
                    println!("{}", module);
                }
            }
        }
        Command::Files { module } => {
            let store = DocumentStore::open(&config.db_path)?;
            let files = store.files_for_module(&module)?;
            if files.is_empty() {
                println!("No files in module {}", module.cyan());
            } else {
                for file in files {
                    println!("{}", file);
                }
            }
        }
        Command::Show { file_name } => {
            let store = DocumentStore::open(&config.db_path)?;
            match store.content_by_file_name(&file_name)? {
                Some(content) => println!("{}", content),
                None => println!("{} Document not found: {}", "✗".red(), file_name),
            }
        }
        Command::Stats => {
            let store = DocumentStore::open(&config.db_path)?;
            let modules = store.list_modules()?;
            let documents = store.all_documents()?;
            println!("Corpus: {}", config.db_path.display().to_string().cyan());
            println!("  Modules: {}", modules.len());
            println!("  Documents: {}", documents.len());
            println!("  Rows: {}", store.row_count()?);
        }
    }

    Ok(())
}
