//! Staleness classification engine
//!
//! Turns a change set into typed records by:
//! - Keeping only paths under the monitored root with the monitored extension
//! - Mapping each source path onto its mirrored documentation path
//! - Checking whether that documentation file already exists

mod classifier;
mod filter;
mod mapper;

pub use classifier::StalenessClassifier;
pub use filter::SourceFilter;
pub use mapper::DocMapper;

use crate::repo::MirrorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Classification of one changed source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Source path relative to the repository root
    pub source_path: String,
    /// Expected documentation path relative to the repository root
    pub doc_path: String,
    /// Whether documentation already exists at `doc_path`
    pub doc_exists: bool,
}

impl ChangeRecord {
    /// Documentation exists for a changed source file and may be out of date
    pub fn is_stale(&self) -> bool {
        self.doc_exists
    }
}

/// Records whose documentation may now be stale, in change-set order
pub fn stale_records(records: &[ChangeRecord]) -> impl Iterator<Item = &ChangeRecord> {
    records.iter().filter(|r| r.is_stale())
}

/// Run filter, mapper and classifier over a change set
pub fn classify_changes(
    repo_root: &Path,
    config: &MirrorConfig,
    paths: &[String],
) -> Vec<ChangeRecord> {
    let monitored = SourceFilter::from_config(config).filter(paths);
    tracing::debug!(
        "{} of {} changed path(s) are monitored",
        monitored.len(),
        paths.len()
    );

    StalenessClassifier::new(repo_root, DocMapper::from_config(config)).classify(&monitored)
}
