//! Documentation existence checks

use super::{ChangeRecord, DocMapper};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Classifies monitored source paths by whether their documentation exists
pub struct StalenessClassifier {
    repo_root: PathBuf,
    mapper: DocMapper,
}

impl StalenessClassifier {
    pub fn new(repo_root: &Path, mapper: DocMapper) -> Self {
        Self {
            repo_root: repo_root.to_path_buf(),
            mapper,
        }
    }

    /// Emit one record per path, in input order. Never fails.
    pub fn classify(&self, source_paths: &[String]) -> Vec<ChangeRecord> {
        source_paths
            .iter()
            .map(|source| {
                let doc_path = self.mapper.map(source);
                let doc_exists = self.doc_exists(&doc_path);
                ChangeRecord {
                    source_path: source.clone(),
                    doc_path,
                    doc_exists,
                }
            })
            .collect()
    }

    fn doc_exists(&self, doc_path: &str) -> bool {
        let full_path = self.repo_root.join(doc_path);
        match std::fs::metadata(&full_path) {
            Ok(meta) => meta.is_file(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                // Under-report rather than abort the run
                tracing::debug!("Existence check failed for {:?}: {}", full_path, e);
                false
            }
        }
    }
}
