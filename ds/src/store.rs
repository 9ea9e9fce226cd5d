//! Core DocumentStore implementation
//!
//! Access is connection-per-call: every query opens a fresh SQLite
//! connection against the store path. Reads never observe a half-applied
//! reload because `replace_all` runs as a single transaction.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised by document store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single row of the documents table
///
/// A module with files is represented by one record per file with all four
/// fields present. An empty module is exactly one record with the three
/// optional fields absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub module: String,
    pub file_name: Option<String>,
    pub content: Option<String>,
    pub file_path: Option<String>,
}

impl DocumentRecord {
    /// Create a record for a document file within a module
    pub fn file(
        module: impl Into<String>,
        file_name: impl Into<String>,
        content: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            file_name: Some(file_name.into()),
            content: Some(content.into()),
            file_path: Some(file_path.into()),
        }
    }

    /// Create the sentinel record for a module without files
    pub fn empty_module(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            file_name: None,
            content: None,
            file_path: None,
        }
    }
}

/// The document corpus store
#[derive(Debug, Clone)]
pub struct DocumentStore {
    db_path: PathBuf,
}

impl DocumentStore {
    /// Open or create a store at the given database path
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let store = Self { db_path };
        let conn = store.connect()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                module TEXT NOT NULL,
                file_name TEXT,
                content TEXT,
                file_path TEXT
            )",
            [],
        )?;
        debug!(db_path = ?store.db_path, "Opened document store");
        Ok(store)
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.db_path)?)
    }

    /// List all distinct module names, ascending
    pub fn list_modules(&self) -> Result<Vec<String>, StoreError> {
        debug!("list_modules: called");
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT DISTINCT module FROM documents ORDER BY module")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// List the file names of a module, ascending
    ///
    /// A module represented only by its sentinel row yields an empty list.
    pub fn files_for_module(&self, module: &str) -> Result<Vec<String>, StoreError> {
        debug!(%module, "files_for_module: called");
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT file_name FROM documents
             WHERE module = ?1 AND file_name IS NOT NULL
             ORDER BY file_name",
        )?;
        let rows = stmt.query_map(params![module], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Fetch the content of a document by exact file name (first match)
    pub fn content_by_file_name(&self, file_name: &str) -> Result<Option<String>, StoreError> {
        debug!(%file_name, "content_by_file_name: called");
        let conn = self.connect()?;
        let content: Option<Option<String>> = conn
            .query_row(
                "SELECT content FROM documents WHERE file_name = ?1",
                params![file_name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(content.flatten())
    }

    /// Fetch all (file_name, content) pairs for a module, ascending by file name
    pub fn module_documents(&self, module: &str) -> Result<Vec<(String, String)>, StoreError> {
        debug!(%module, "module_documents: called");
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT file_name, content FROM documents
             WHERE module = ?1 AND content IS NOT NULL
             ORDER BY file_name",
        )?;
        let rows = stmt.query_map(params![module], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Fetch the entire (file_name, content) corpus, excluding sentinel rows
    pub fn all_documents(&self) -> Result<Vec<(String, String)>, StoreError> {
        debug!("all_documents: called");
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT file_name, content FROM documents WHERE content IS NOT NULL")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Replace the whole corpus: clear the table, then bulk-insert records
    ///
    /// Runs as one transaction. This is a maintenance operation and must not
    /// run concurrently with analysis requests or with itself.
    pub fn replace_all(&self, records: &[DocumentRecord]) -> Result<usize, StoreError> {
        info!(record_count = records.len(), "replace_all: reloading corpus");
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM documents", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO documents (module, file_name, content, file_path)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.module,
                    record.file_name,
                    record.content,
                    record.file_path
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// Total row count (sentinel rows included)
    pub fn row_count(&self) -> Result<usize, StoreError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
