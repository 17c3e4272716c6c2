//! Command implementations

use super::OutputFormat;
use crate::manifest::Manifest;
use crate::report::ReportRenderer;
use crate::repo::{change_paths, MirrorConfig, Repository};
use crate::stale::{classify_changes, stale_records, ChangeRecord};
use anyhow::{Context, Result};
use std::path::Path;

/// Lifecycle entry point invoked by the git hook
///
/// Never fails: a repository that cannot be read, a change set that cannot
/// be resolved or a manifest that cannot be written all end in silence.
/// Only a configuration problem is logged, once; it still clears the
/// previous manifest so no earlier run's list survives.
pub fn notify(repo_root: &Path, format: OutputFormat) -> Vec<ChangeRecord> {
    let repo = match Repository::open(repo_root) {
        Ok(repo) => repo,
        Err(e) => {
            tracing::debug!("Skipping notification: {}", e);
            return Vec::new();
        }
    };

    let config = match MirrorConfig::load_or_default(repo.root()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("docmirror is misconfigured, skipping: {}", e);
            clear_manifest(&repo, &MirrorConfig::default());
            return Vec::new();
        }
    };

    if let Err(e) = config.validate(repo.root()) {
        tracing::error!("docmirror is misconfigured, skipping: {}", e);
        clear_manifest(&repo, &config);
        return Vec::new();
    }

    let changes = repo.resolve_change_set();
    let records = classify_changes(repo.root(), &config, &change_paths(&changes));

    if stale_records(&records).next().is_some() {
        let renderer = ReportRenderer::new(&config);
        match format {
            OutputFormat::Text => print!("{}", renderer.render(&records)),
            OutputFormat::Json => match renderer.render_json(&records) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::debug!("Failed to render JSON report: {}", e),
            },
        }
    }

    let manifest = Manifest::new(repo.git_dir(), &config.manifest_path);
    match manifest.persist(&records) {
        Ok(0) => {}
        Ok(n) => {
            tracing::debug!("{} entries queued for regeneration", n);
            if format == OutputFormat::Text {
                println!("Manifest: {}", manifest.path().display());
            }
        }
        Err(e) => tracing::warn!("Failed to write manifest: {}", e),
    }

    records
}

/// Run `f`, turning a panic into `None` without printing the default panic
/// message; the previous panic hook is restored afterwards
pub fn run_silently<R>(f: impl FnOnce() -> R + std::panic::UnwindSafe) -> Option<R> {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(|info| {
        tracing::debug!("Notification aborted by a panic: {}", info);
    }));
    let outcome = std::panic::catch_unwind(f);
    std::panic::set_hook(previous);
    outcome.ok()
}

/// Remove the manifest at the configured location, or the default one when
/// the configured location cannot be trusted
fn clear_manifest(repo: &Repository, config: &MirrorConfig) {
    let default_path = MirrorConfig::default().manifest_path;
    let relative = config
        .checked_manifest_path()
        .unwrap_or(default_path.as_str());

    if let Err(e) = Manifest::new(repo.git_dir(), relative).clear() {
        tracing::debug!("Failed to clear manifest: {}", e);
    }
}

/// Check for stale documentation on demand
///
/// Uses the same pipeline as [`notify`], but errors are reported instead of
/// swallowed and the manifest is only rewritten when asked.
pub fn check(
    path: &Path,
    range: Option<&str>,
    full: bool,
    write_manifest: bool,
    format: OutputFormat,
) -> Result<Vec<ChangeRecord>> {
    let repo = Repository::open(path)?;
    let config = MirrorConfig::load_validated(repo.root())?;

    let paths = if full {
        repo.list_source_files(&config)?
    } else if let Some(range_str) = range {
        let (from, to) = parse_range(range_str)?;
        change_paths(&repo.changes_between(from, to)?)
    } else {
        change_paths(&repo.update_changes()?)
    };

    tracing::info!("Checking {} path(s)", paths.len());

    let records = classify_changes(repo.root(), &config, &paths);

    let renderer = ReportRenderer::new(&config);
    match format {
        OutputFormat::Json => println!("{}", renderer.render_json(&records)?),
        OutputFormat::Text => {
            let report = renderer.render(&records);
            if report.is_empty() {
                println!("✓ No stale documentation.");
            } else {
                print!("{}", report);
            }
        }
    }

    if write_manifest {
        let manifest = Manifest::new(repo.git_dir(), &config.manifest_path);
        let written = manifest
            .persist(&records)
            .context("Failed to write manifest")?;
        if format == OutputFormat::Text {
            println!("✓ Manifest updated ({} entries)", written);
        }
    }

    Ok(records)
}

/// Split `"A..B"` into its endpoints; a single revision means `rev..HEAD`
fn parse_range(range: &str) -> Result<(&str, &str)> {
    match range.split_once("..") {
        Some((from, to)) if !from.is_empty() && !to.is_empty() => Ok((from, to)),
        Some((from, "")) if !from.is_empty() => Ok((from, "HEAD")),
        Some(_) => anyhow::bail!("Invalid range {:?}, expected FROM..TO", range),
        None => Ok((range, "HEAD")),
    }
}

/// Show or clear the manifest
pub fn status(path: &Path, clear: bool, format: OutputFormat) -> Result<()> {
    let repo = Repository::open(path)?;
    let config = MirrorConfig::load_or_default(repo.root())?;
    let manifest = Manifest::new(repo.git_dir(), &config.manifest_path);

    if clear {
        manifest.clear()?;
        println!("✓ Cleared manifest {}", manifest.path().display());
        return Ok(());
    }

    let entries = manifest
        .load()
        .with_context(|| format!("Failed to read manifest {:?}", manifest.path()))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("✓ No pending documentation updates.");
                return Ok(());
            }

            println!("Pending documentation updates ({}):", entries.len());
            println!("---------------------------------\n");
            for entry in &entries {
                println!("  {}", entry);
            }
        }
    }

    Ok(())
}

/// Show or initialize configuration
pub fn config(path: &Path, init: bool, format: OutputFormat) -> Result<()> {
    let repo = Repository::open(path)?;

    if init {
        let config_path = MirrorConfig::config_path(repo.root());
        if config_path.exists() {
            anyhow::bail!("Configuration already exists at {:?}", config_path);
        }
        MirrorConfig::default().save(repo.root())?;
        println!("✓ Wrote default configuration to {:?}", config_path);
        return Ok(());
    }

    let config = MirrorConfig::load_or_default(repo.root())?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => {
            println!("DocMirror Configuration");
            println!("=======================\n");
            println!("Monitored root:      {}", config.source_root());
            println!("Monitored extension: {}", config.source_extension);
            println!("Documentation root:  {}", config.docs_root());
            println!("Documentation suffix: {}", config.doc_suffix);
            println!(
                "Manifest:            {}",
                repo.git_dir().join(&config.manifest_path).display()
            );
            println!("Instruction:         {}", config.instruction);
        }
    }

    if let Err(e) = config.validate(repo.root()) {
        eprintln!("⚠ {}", e);
    }

    Ok(())
}
