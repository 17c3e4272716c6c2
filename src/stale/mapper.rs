//! Source path → documentation path mapping

use crate::repo::{normalize_root, MirrorConfig};

/// Pure prefix/suffix transform from a source path to its mirrored doc path
#[derive(Debug, Clone)]
pub struct DocMapper {
    docs_root: String,
    suffix: String,
}

impl DocMapper {
    pub fn new(docs_root: &str, suffix: &str) -> Self {
        Self {
            docs_root: normalize_root(docs_root),
            suffix: suffix.to_string(),
        }
    }

    pub fn from_config(config: &MirrorConfig) -> Self {
        Self::new(&config.docs_root(), &config.doc_suffix)
    }

    /// `docs_root + "/" + source_path + suffix`
    pub fn map(&self, source_path: &str) -> String {
        format!("{}/{}{}", self.docs_root, source_path, self.suffix)
    }
}
