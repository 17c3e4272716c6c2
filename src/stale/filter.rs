//! Narrowing a change set to the monitored source tree

use crate::repo::{normalize_root, MirrorConfig};
use std::path::Path;

/// Keeps paths under the monitored root that carry the monitored extension
#[derive(Debug, Clone)]
pub struct SourceFilter {
    root: String,
    extension: String,
}

impl SourceFilter {
    pub fn new(root: &str, extension: &str) -> Self {
        Self {
            root: normalize_root(root),
            extension: extension.to_string(),
        }
    }

    pub fn from_config(config: &MirrorConfig) -> Self {
        Self::new(&config.source_root(), &config.source_extension)
    }

    /// Check a single repository-relative path
    pub fn matches(&self, path: &str) -> bool {
        // Component-wise, so `src` does not claim `srcgen/x.rs`
        let under_root = Path::new(path).starts_with(&self.root) && path.len() > self.root.len();
        under_root && path.ends_with(&self.extension)
    }

    /// Keep matching paths, preserving input order
    pub fn filter(&self, paths: &[String]) -> Vec<String> {
        paths.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}
