//! DocStore - module/document corpus store for requirement analysis
//!
//! Stores a corpus of structured documents grouped into modules, backed by
//! a single SQLite table. Documents are imported from a directory tree where
//! each subdirectory is a module and each markdown file inside it is a
//! document. A module without any files is kept as a single sentinel row so
//! the module itself stays discoverable.
//!
//! # Layout
//!
//! ```text
//! documents(id, module, file_name, content, file_path)
//!   module with k files -> k rows, all columns present
//!   empty module        -> 1 row, file_name/content/file_path NULL
//! ```

pub mod cli;
pub mod config;
mod import;
mod store;

pub use import::{ImportStats, scan_corpus_dir};
pub use store::{DocumentRecord, DocumentStore, StoreError};

/// Default database file name inside the store directory
pub const DEFAULT_DB_FILE: &str = "documents.db3";
