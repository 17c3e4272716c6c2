//! Manifest persistence
//!
//! The manifest is a newline-delimited list of source paths whose
//! documentation may be stale. It lives in the git directory, is rewritten
//! in full on every run and is removed when there is nothing to list.

use crate::error::{io_err, MirrorResult};
use crate::stale::{stale_records, ChangeRecord};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Handle on the manifest file of one repository
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
}

impl Manifest {
    /// Manifest at `relative` inside the git directory `git_dir`
    pub fn new(git_dir: &Path, relative: &str) -> Self {
        Self {
            path: git_dir.join(relative),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the manifest with the stale records' source paths
    ///
    /// Returns the number of entries written. With zero entries the
    /// manifest is removed so a previous run's list never lingers.
    pub fn persist(&self, records: &[ChangeRecord]) -> MirrorResult<usize> {
        let entries: Vec<&str> = stale_records(records)
            .map(|r| r.source_path.as_str())
            .collect();

        if entries.is_empty() {
            self.clear()?;
            return Ok(0);
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }

        let mut content = entries.join("\n");
        content.push('\n');

        // Write-then-rename so readers never see a half-written list
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| io_err(&self.path, e))?;

        tracing::debug!("Wrote {} manifest entries to {:?}", entries.len(), self.path);
        Ok(entries.len())
    }

    /// Current manifest entries; empty when the file is absent
    pub fn load(&self) -> MirrorResult<Vec<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(content
                .lines()
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(io_err(&self.path, e)),
        }
    }

    /// Remove the manifest if present
    pub fn clear(&self) -> MirrorResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Removed manifest {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(&self.path, e)),
        }
    }
}
