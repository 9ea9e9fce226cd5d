//! Corpus import - scan a directory tree into document records
//!
//! Expected layout: each first-level subdirectory is a module, each `.md`
//! file inside it is a document. A subdirectory without markdown files
//! becomes a single sentinel record so the module stays listed.

use std::path::Path;

use eyre::{Result, WrapErr};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::store::DocumentRecord;

/// Summary of a corpus scan
#[derive(Debug, Clone, Default)]
pub struct ImportStats {
    pub modules: usize,
    pub documents: usize,
    pub empty_modules: usize,
}

/// Scan a corpus directory into records suitable for `DocumentStore::replace_all`
///
/// The file name stored is the file stem (no `.md` extension), matching how
/// documents are referenced by the analysis tools.
pub fn scan_corpus_dir(root: impl AsRef<Path>) -> Result<(Vec<DocumentRecord>, ImportStats)> {
    let root = root.as_ref();
    let mut records = Vec::new();
    let mut stats = ImportStats::default();

    let mut module_dirs: Vec<_> = std::fs::read_dir(root)
        .wrap_err_with(|| format!("Failed to read corpus directory {}", root.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.path())
        .collect();
    module_dirs.sort();

    for module_dir in module_dirs {
        let module = match module_dir.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => {
                warn!(path = ?module_dir, "Skipping module directory with non-UTF8 name");
                continue;
            }
        };
        stats.modules += 1;

        // Direct children only; nested directories never contribute documents
        let mut md_files: Vec<_> = WalkDir::new(&module_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "md"))
            .map(|entry| entry.into_path())
            .collect();
        md_files.sort();

        if md_files.is_empty() {
            debug!(%module, "scan_corpus_dir: empty module, writing sentinel");
            records.push(DocumentRecord::empty_module(&module));
            stats.empty_modules += 1;
            continue;
        }

        for path in md_files {
            let file_name = match path.file_stem().and_then(|n| n.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            let content = std::fs::read_to_string(&path)
                .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
            records.push(DocumentRecord::file(
                &module,
                file_name,
                content,
                path.display().to_string(),
            ));
            stats.documents += 1;
        }
    }

    Ok((records, stats))
}
