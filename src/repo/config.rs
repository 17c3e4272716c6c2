//! Repository configuration for DocMirror

use crate::error::{MirrorError, MirrorResult};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// Directory holding the optional configuration file, relative to the work tree
pub const CONFIG_DIR: &str = ".docmirror";

/// Configuration file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.toml";

/// Settings that tie the monitored source tree to its documentation mirror
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Subtree whose files are monitored (relative to the repository root)
    #[serde(default = "default_source_root")]
    pub source_root: String,

    /// Suffix a monitored file must end with, including the leading dot
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Root of the mirrored documentation tree
    #[serde(default = "default_docs_root")]
    pub docs_root: String,

    /// Suffix appended after the source file's own extension
    #[serde(default = "default_doc_suffix")]
    pub doc_suffix: String,

    /// Manifest location, relative to the git directory
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,

    /// Batch instruction template; `{files}` and `{docs_root}` are substituted
    #[serde(default = "default_instruction")]
    pub instruction: String,
}

fn default_source_root() -> String {
    "src".to_string()
}

fn default_source_extension() -> String {
    ".rs".to_string()
}

fn default_docs_root() -> String {
    "docs".to_string()
}

fn default_doc_suffix() -> String {
    ".md".to_string()
}

fn default_manifest_path() -> String {
    "docmirror/stale-docs.txt".to_string()
}

fn default_instruction() -> String {
    "Update the documentation under {docs_root}/ for these changed files: {files}".to_string()
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            source_extension: default_source_extension(),
            docs_root: default_docs_root(),
            doc_suffix: default_doc_suffix(),
            manifest_path: default_manifest_path(),
            instruction: default_instruction(),
        }
    }
}

impl MirrorConfig {
    /// Path of the configuration file for a work tree
    pub fn config_path(repo_root: &Path) -> std::path::PathBuf {
        repo_root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load configuration from the repository or return defaults
    pub fn load_or_default(repo_root: &Path) -> MirrorResult<Self> {
        let config_path = Self::config_path(repo_root);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            MirrorError::Configuration(format!("failed to read {:?}: {}", config_path, e))
        })?;
        toml::from_str(&content).map_err(|e| {
            MirrorError::Configuration(format!("failed to parse {:?}: {}", config_path, e))
        })
    }

    /// Load and validate in one step
    pub fn load_validated(repo_root: &Path) -> MirrorResult<Self> {
        let config = Self::load_or_default(repo_root)?;
        config.validate(repo_root)?;
        Ok(config)
    }

    /// Save configuration to the repository
    pub fn save(&self, repo_root: &Path) -> MirrorResult<()> {
        let config_path = Self::config_path(repo_root);
        let dir = repo_root.join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).map_err(|e| crate::error::io_err(&dir, e))?;

        let content = toml::to_string_pretty(self).map_err(|e| {
            MirrorError::Configuration(format!("failed to serialize configuration: {}", e))
        })?;

        std::fs::write(&config_path, content).map_err(|e| crate::error::io_err(&config_path, e))
    }

    /// Check the settings against each other and against the work tree
    pub fn validate(&self, repo_root: &Path) -> MirrorResult<()> {
        check_relative("source_root", &self.source_root)?;
        check_relative("docs_root", &self.docs_root)?;
        check_relative("manifest_path", &self.manifest_path)?;

        if self.source_root() == self.docs_root() {
            return Err(MirrorError::Configuration(format!(
                "source_root and docs_root must differ (both are {:?})",
                self.source_root
            )));
        }

        if !self.source_extension.starts_with('.') || self.source_extension.len() < 2 {
            return Err(MirrorError::Configuration(format!(
                "source_extension must look like \".ext\", got {:?}",
                self.source_extension
            )));
        }

        if self.doc_suffix.is_empty() {
            return Err(MirrorError::Configuration(
                "doc_suffix must not be empty".to_string(),
            ));
        }

        let source_dir = repo_root.join(&self.source_root);
        if !source_dir.is_dir() {
            return Err(MirrorError::Configuration(format!(
                "monitored root {:?} is not a directory",
                source_dir
            )));
        }

        let docs_dir = repo_root.join(&self.docs_root);
        if docs_dir.exists() && !docs_dir.is_dir() {
            return Err(MirrorError::Configuration(format!(
                "documentation root {:?} is not a directory",
                docs_dir
            )));
        }

        Ok(())
    }

    /// Monitored root in the `/`-separated form git reports paths in
    pub fn source_root(&self) -> String {
        normalize_root(&self.source_root)
    }

    /// Documentation root in the `/`-separated form git reports paths in
    pub fn docs_root(&self) -> String {
        normalize_root(&self.docs_root)
    }

    /// `manifest_path`, provided it stays inside the git directory
    pub fn checked_manifest_path(&self) -> MirrorResult<&str> {
        check_relative("manifest_path", &self.manifest_path)?;
        Ok(&self.manifest_path)
    }
}

/// Drop `.` segments, empty segments and trailing separators: `./src/` → `src`
pub fn normalize_root(value: &str) -> String {
    value
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

fn check_relative(key: &str, value: &str) -> MirrorResult<()> {
    let path = Path::new(value);
    if value.trim().is_empty() {
        return Err(MirrorError::Configuration(format!("{} must not be empty", key)));
    }
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    let names_nothing = !path.components().any(|c| matches!(c, Component::Normal(_)));
    if escapes || names_nothing {
        return Err(MirrorError::Configuration(format!(
            "{} must be a relative path inside the repository, got {:?}",
            key, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_no_file() {
        let dir = TempDir::new().unwrap();
        let config = MirrorConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config, MirrorConfig::default());
        assert_eq!(config.docs_root(), "docs");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();
        std::fs::write(
            MirrorConfig::config_path(dir.path()),
            "source_root = \"lib/\"\nsource_extension = \".py\"\n",
        )
        .unwrap();

        let config = MirrorConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.source_root(), "lib");
        assert_eq!(config.source_extension, ".py");
        assert_eq!(config.doc_suffix, ".md");
    }

    #[test]
    fn test_curdir_roots_are_normalized() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();

        let config = MirrorConfig {
            source_root: "./src/".to_string(),
            docs_root: "./docs".to_string(),
            ..Default::default()
        };
        assert!(config.validate(dir.path()).is_ok());
        assert_eq!(config.source_root(), "src");
        assert_eq!(config.docs_root(), "docs");

        let same = MirrorConfig {
            docs_root: "./src".to_string(),
            ..Default::default()
        };
        assert!(same.validate(dir.path()).is_err());
    }

    #[test]
    fn test_normalize_root() {
        assert_eq!(normalize_root("src"), "src");
        assert_eq!(normalize_root("./src/lib/"), "src/lib");
        assert_eq!(normalize_root("src/./lib"), "src/lib");
    }

    #[test]
    fn test_checked_manifest_path() {
        assert!(MirrorConfig::default().checked_manifest_path().is_ok());
        let escaping = MirrorConfig {
            manifest_path: "../outside.txt".to_string(),
            ..Default::default()
        };
        assert!(escaping.checked_manifest_path().is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let config = MirrorConfig {
            docs_root: "mirror".to_string(),
            ..Default::default()
        };
        config.save(dir.path()).unwrap();
        assert_eq!(MirrorConfig::load_or_default(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();
        std::fs::write(MirrorConfig::config_path(dir.path()), "source_root = [").unwrap();

        let err = MirrorConfig::load_or_default(dir.path()).unwrap_err();
        assert!(matches!(err, MirrorError::Configuration(_)));
    }

    #[test]
    fn test_validate() {
        let dir = TempDir::new().unwrap();
        let config = MirrorConfig::default();

        // src/ does not exist yet
        assert!(matches!(
            config.validate(dir.path()),
            Err(MirrorError::Configuration(_))
        ));

        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        assert!(config.validate(dir.path()).is_ok());

        std::fs::write(dir.path().join("docs"), "not a dir").unwrap();
        assert!(config.validate(dir.path()).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();

        let escaping = MirrorConfig {
            docs_root: "../elsewhere".to_string(),
            ..Default::default()
        };
        assert!(escaping.validate(dir.path()).is_err());

        let same = MirrorConfig {
            docs_root: "src".to_string(),
            ..Default::default()
        };
        assert!(same.validate(dir.path()).is_err());

        let no_dot = MirrorConfig {
            source_extension: "rs".to_string(),
            ..Default::default()
        };
        assert!(no_dot.validate(dir.path()).is_err());

        let no_suffix = MirrorConfig {
            doc_suffix: String::new(),
            ..Default::default()
        };
        assert!(no_suffix.validate(dir.path()).is_err());
    }
}
