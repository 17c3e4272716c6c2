//! Repository access and change-set resolution
//!
//! This module handles Git repository operations including:
//! - Opening the repository at an externally supplied root
//! - Resolving the files changed by the last update (`ORIG_HEAD` → `HEAD`)
//! - Listing the monitored source tree for full checks

mod change;
mod config;

pub use change::{change_paths, ChangeKind, ChangedFile};
pub use config::{normalize_root, MirrorConfig, CONFIG_DIR, CONFIG_FILE};

use crate::error::{io_err, repo_err, MirrorError, MirrorResult};
use git2::{Commit, DiffFindOptions, DiffOptions, Repository as GitRepo};
use std::path::{Path, PathBuf};

/// Revisions tried, in order, as the state before the last update
const PREVIOUS_STATE_REFS: [&str; 2] = ["ORIG_HEAD", "HEAD@{1}"];

/// A Git repository whose documentation mirror is being checked
pub struct Repository {
    /// The underlying git2 repository
    repo: GitRepo,
    /// Path to the work tree root
    root: PathBuf,
}

impl Repository {
    /// Open the repository rooted exactly at `path` (no upward discovery)
    pub fn open<P: AsRef<Path>>(path: P) -> MirrorResult<Self> {
        let path = path.as_ref();
        let repo = GitRepo::open(path)
            .map_err(|e| repo_err(format!("failed to open Git repository at {:?}", path), e))?;

        let root = repo
            .workdir()
            .ok_or_else(|| MirrorError::Repository {
                message: "repository has no working directory (bare repo?)".to_string(),
                source: None,
            })?
            .to_path_buf();

        Ok(Self { repo, root })
    }

    /// Get the work tree root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The repository's private state directory (`.git/`)
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// Directory git runs hooks from: `core.hooksPath` when set, otherwise
    /// `hooks/` in the common directory shared by all worktrees
    pub fn hooks_dir(&self) -> PathBuf {
        match self
            .repo
            .config()
            .and_then(|config| config.get_path("core.hooksPath"))
        {
            Ok(path) if path.is_absolute() => path,
            Ok(path) => self.root.join(path),
            Err(_) => self.repo.commondir().join("hooks"),
        }
    }

    /// Get the current HEAD commit, or `None` on an unborn branch
    pub fn head_commit(&self) -> MirrorResult<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => head
                .peel_to_commit()
                .map(Some)
                .map_err(|e| repo_err("failed to peel HEAD to commit", e)),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => Ok(None),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(repo_err("failed to read HEAD", e)),
        }
    }

    /// The commit HEAD pointed at before the last update, if git recorded one
    pub fn previous_commit(&self) -> Option<Commit<'_>> {
        PREVIOUS_STATE_REFS.iter().find_map(|rev| {
            match self.repo.revparse_single(rev).and_then(|o| o.peel_to_commit()) {
                Ok(commit) => {
                    tracing::debug!("Previous state {} is {}", rev, commit.id());
                    Some(commit)
                }
                Err(e) => {
                    tracing::debug!("No previous state at {}: {}", rev, e.message());
                    None
                }
            }
        })
    }

    /// Files added or modified by the last update
    ///
    /// Returns an empty list when there is no previous state to compare
    /// against (single revision, unborn HEAD, no-op fast-forward).
    pub fn update_changes(&self) -> MirrorResult<Vec<ChangedFile>> {
        let Some(current) = self.head_commit()? else {
            return Ok(Vec::new());
        };
        let Some(previous) = self.previous_commit() else {
            return Ok(Vec::new());
        };

        if previous.id() == current.id() {
            return Ok(Vec::new());
        }

        self.diff_commits(&previous, &current)
    }

    /// [`Repository::update_changes`], degrading every failure to an empty list
    pub fn resolve_change_set(&self) -> Vec<ChangedFile> {
        match self.update_changes() {
            Ok(changes) => changes,
            Err(e) => {
                tracing::debug!("Change set unavailable, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Files added or modified between two revisions
    pub fn changes_between(&self, from: &str, to: &str) -> MirrorResult<Vec<ChangedFile>> {
        let from_commit = self.resolve_commit(from)?;
        let to_commit = self.resolve_commit(to)?;
        self.diff_commits(&from_commit, &to_commit)
    }

    fn resolve_commit(&self, rev: &str) -> MirrorResult<Commit<'_>> {
        self.repo
            .revparse_single(rev)
            .and_then(|o| o.peel_to_commit())
            .map_err(|e| repo_err(format!("failed to resolve revision {}", rev), e))
    }

    fn diff_commits(&self, from: &Commit<'_>, to: &Commit<'_>) -> MirrorResult<Vec<ChangedFile>> {
        let from_tree = from
            .tree()
            .map_err(|e| repo_err("failed to get tree for previous state", e))?;
        let to_tree = to
            .tree()
            .map_err(|e| repo_err("failed to get tree for current state", e))?;

        let mut diff_opts = DiffOptions::new();
        diff_opts.include_untracked(false).include_typechange(true);

        let mut diff = self
            .repo
            .diff_tree_to_tree(Some(&from_tree), Some(&to_tree), Some(&mut diff_opts))
            .map_err(|e| repo_err("failed to compute diff", e))?;

        // Pair deletions with additions so a moved file reports its new path once
        let mut find_opts = DiffFindOptions::new();
        find_opts.renames(true);
        diff.find_similar(Some(&mut find_opts))
            .map_err(|e| repo_err("failed to detect renames", e))?;

        let changes: Vec<ChangedFile> = diff
            .deltas()
            .filter_map(|delta| {
                let kind = ChangeKind::from_delta(delta.status())?;
                let path = delta.new_file().path()?.to_path_buf();
                tracing::debug!("{} {}", kind, path.display());
                Some(ChangedFile { path, kind })
            })
            .collect();

        tracing::debug!(
            "{} file(s) changed between {} and {}",
            changes.len(),
            from.id(),
            to.id()
        );

        Ok(changes)
    }

    /// Every file under the monitored root, as sorted repository-relative paths
    pub fn list_source_files(&self, config: &MirrorConfig) -> MirrorResult<Vec<String>> {
        let source_dir = self.root.join(config.source_root());
        let mut files = Vec::new();

        for entry in walkdir::WalkDir::new(&source_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !e.file_name().to_str().unwrap_or("").starts_with('.')
            })
        {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| source_dir.clone());
                io_err(path, std::io::Error::other(e.to_string()))
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(&self.root).map_err(|_| {
                MirrorError::Configuration(format!(
                    "{:?} is outside the repository root",
                    entry.path()
                ))
            })?;

            if let Some(path) = relative.to_str() {
                files.push(path.replace(std::path::MAIN_SEPARATOR, "/"));
            }
        }

        Ok(files)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use git2::{IndexAddOption, Oid, Repository as GitRepo, Signature};
    use std::path::Path;

    /// Write a file relative to the work tree, creating parent directories
    pub fn write_file(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    /// Stage everything and commit on HEAD
    pub fn commit_all(repo: &GitRepo, message: &str) -> Oid {
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.update_all(["*"].iter(), None).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("Test", "test@example.com").unwrap();

        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    /// Record `oid` as the pre-update state, the way merge and pull do
    pub fn set_orig_head(repo: &GitRepo, oid: Oid) {
        std::fs::write(repo.path().join("ORIG_HEAD"), format!("{}\n", oid)).unwrap();
    }
}
