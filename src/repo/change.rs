//! Change tracking types for repository updates

use std::path::PathBuf;

/// A file that differs between the previous and current repository state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    /// Path to the file relative to repository root
    pub path: PathBuf,
    /// Type of change
    pub kind: ChangeKind,
}

impl ChangedFile {
    /// Path as a `/`-separated string, if it is valid UTF-8
    pub fn path_str(&self) -> Option<&str> {
        self.path.to_str()
    }
}

/// Type of change made to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File was added
    Added,
    /// File was modified
    Modified,
    /// File arrived under a new name
    Renamed,
}

impl ChangeKind {
    /// Map a git delta onto a change kind; deletions and no-ops yield `None`
    pub fn from_delta(delta: git2::Delta) -> Option<Self> {
        match delta {
            git2::Delta::Added | git2::Delta::Copied => Some(ChangeKind::Added),
            git2::Delta::Modified | git2::Delta::Typechange => Some(ChangeKind::Modified),
            git2::Delta::Renamed => Some(ChangeKind::Renamed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "added"),
            ChangeKind::Modified => write!(f, "modified"),
            ChangeKind::Renamed => write!(f, "renamed"),
        }
    }
}

/// Extract the `/`-separated paths of a change set, skipping non-UTF-8 names
pub fn change_paths(changes: &[ChangedFile]) -> Vec<String> {
    changes
        .iter()
        .filter_map(|c| {
            let path = c.path_str();
            if path.is_none() {
                tracing::debug!("Skipping non UTF-8 path {:?}", c.path);
            }
            path.map(str::to_string)
        })
        .collect()
}
