//! DocMirror - stale documentation notifier for mirrored documentation trees
//!
//! After each repository update this library works out which monitored
//! source files changed, maps each onto its mirrored documentation file, and
//! reports the ones whose documentation already exists and may be stale.

pub mod cli;
pub mod error;
pub mod manifest;
pub mod report;
pub mod repo;
pub mod stale;

/// Re-export commonly used types
pub use error::{MirrorError, MirrorResult};
pub use manifest::Manifest;
pub use report::ReportRenderer;
pub use repo::{MirrorConfig, Repository};
pub use stale::{ChangeRecord, DocMapper, SourceFilter, StalenessClassifier};

/// Application-wide error type
pub use anyhow::Result;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "docmirror";
