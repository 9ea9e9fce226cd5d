//! DocumentSource - the engine's view of the document store
//!
//! The store is an external collaborator: the engine only ever consumes
//! these five read queries. A failing query means the collaborator is
//! unusable, so callers propagate the error instead of retrying.

use std::sync::Arc;

use async_trait::async_trait;
use eyre::{Result, WrapErr};

use docstore::DocumentStore;

/// Read access to the module/document corpus
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// All distinct module names, ascending
    async fn modules(&self) -> Result<Vec<String>>;

    /// File names of a module, ascending; empty for a sentinel-only module
    async fn files_for_module(&self, module: &str) -> Result<Vec<String>>;

    /// Content of a document by exact file name, first match
    async fn document_content(&self, file_name: &str) -> Result<Option<String>>;

    /// All (file_name, content) pairs of a module
    async fn module_documents(&self, module: &str) -> Result<Vec<(String, String)>>;

    /// The entire (file_name, content) corpus
    async fn all_documents(&self) -> Result<Vec<(String, String)>>;
}

/// DocumentSource backed by the SQLite docstore
///
/// The store is connection-per-call and cheap to clone, so each query runs
/// on the blocking pool without holding any shared handle.
pub struct SqliteDocumentSource {
    store: DocumentStore,
}

impl SqliteDocumentSource {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Open the store at a path and wrap it
    pub fn open(db_path: impl AsRef<std::path::Path>) -> Result<Arc<dyn DocumentSource>> {
        let store = DocumentStore::open(db_path).wrap_err("Failed to open document store")?;
        Ok(Arc::new(Self::new(store)))
    }
}

#[async_trait]
impl DocumentSource for SqliteDocumentSource {
    async fn modules(&self) -> Result<Vec<String>> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.list_modules())
            .await
            .wrap_err("Store query task failed")?
            .wrap_err("Failed to list modules")
    }

    async fn files_for_module(&self, module: &str) -> Result<Vec<String>> {
        let store = self.store.clone();
        let module = module.to_string();
        tokio::task::spawn_blocking(move || store.files_for_module(&module))
            .await
            .wrap_err("Store query task failed")?
            .wrap_err("Failed to list files")
    }

    async fn document_content(&self, file_name: &str) -> Result<Option<String>> {
        let store = self.store.clone();
        let file_name = file_name.to_string();
        tokio::task::spawn_blocking(move || store.content_by_file_name(&file_name))
            .await
            .wrap_err("Store query task failed")?
            .wrap_err("Failed to fetch document content")
    }

    async fn module_documents(&self, module: &str) -> Result<Vec<(String, String)>> {
        let store = self.store.clone();
        let module = module.to_string();
        tokio::task::spawn_blocking(move || store.module_documents(&module))
            .await
            .wrap_err("Store query task failed")?
            .wrap_err("Failed to fetch module documents")
    }

    async fn all_documents(&self) -> Result<Vec<(String, String)>> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.all_documents())
            .await
            .wrap_err("Store query task failed")?
            .wrap_err("Failed to fetch corpus")
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;

    /// In-memory DocumentSource for unit tests
    #[derive(Default)]
    pub struct MockDocumentSource {
        /// module -> [(file_name, content)]; empty vec models an empty module
        pub modules: BTreeMap<String, Vec<(String, String)>>,
        /// When set, every query fails (store fault injection)
        pub fail: bool,
    }

    impl MockDocumentSource {
        pub fn with_documents(docs: Vec<(&str, &str, &str)>) -> Self {
            let mut modules: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
            for (module, file_name, content) in docs {
                modules
                    .entry(module.to_string())
                    .or_default()
                    .push((file_name.to_string(), content.to_string()));
            }
            Self { modules, fail: false }
        }

        pub fn failing() -> Self {
            Self {
                modules: BTreeMap::new(),
                fail: true,
            }
        }

        fn check(&self) -> Result<()> {
            if self.fail {
                Err(eyre::eyre!("store unavailable"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl DocumentSource for MockDocumentSource {
        async fn modules(&self) -> Result<Vec<String>> {
            self.check()?;
            Ok(self.modules.keys().cloned().collect())
        }

        async fn files_for_module(&self, module: &str) -> Result<Vec<String>> {
            self.check()?;
            Ok(self
                .modules
                .get(module)
                .map(|files| files.iter().map(|(name, _)| name.clone()).collect())
                .unwrap_or_default())
        }

        async fn document_content(&self, file_name: &str) -> Result<Option<String>> {
            self.check()?;
            Ok(self
                .modules
                .values()
                .flatten()
                .find(|(name, _)| name == file_name)
                .map(|(_, content)| content.clone()))
        }

        async fn module_documents(&self, module: &str) -> Result<Vec<(String, String)>> {
            self.check()?;
            Ok(self.modules.get(module).cloned().unwrap_or_default())
        }

        async fn all_documents(&self) -> Result<Vec<(String, String)>> {
            self.check()?;
            Ok(self.modules.values().flatten().cloned().collect())
        }
    }
}
