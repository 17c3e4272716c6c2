//! CLI interface using clap
//!
//! Provides the command-line interface for DocMirror

mod commands;
mod hooks;

pub use commands::*;
pub use hooks::{hooks, HOOK_MARKER, HOOK_NAMES};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DocMirror - flags mirrored documentation that may be stale after an update
#[derive(Parser, Debug)]
#[command(name = "docmirror")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the repository root for manual commands
    #[arg(short, long, global = true, default_value = ".")]
    pub path: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lifecycle entry point run by the git hook; always exits 0
    Hook(HookArgs),

    /// Check for stale documentation on demand
    Check(CheckArgs),

    /// Show or clear the manifest of stale documentation
    Status(StatusArgs),

    /// Install git hooks for automatic notification
    Hooks(HooksArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for hook command
#[derive(Parser, Debug)]
pub struct HookArgs {
    /// Repository root, as passed by the hook shim
    pub repo_root: PathBuf,
}

/// Arguments for check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Commit range to check (e.g., "HEAD~5..HEAD") instead of the last update
    #[arg(short, long, conflicts_with = "full")]
    pub range: Option<String>,

    /// Check every file under the monitored root, not just changed ones
    #[arg(short, long)]
    pub full: bool,

    /// Rewrite the manifest from this check's result
    #[arg(short, long)]
    pub write_manifest: bool,

    /// Exit with status 1 when stale documentation is found
    #[arg(long)]
    pub exit_code: bool,
}

/// Arguments for status command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Remove the manifest
    #[arg(long)]
    pub clear: bool,
}

/// Arguments for hooks command
#[derive(Parser, Debug)]
pub struct HooksArgs {
    /// Install hooks
    #[arg(long, conflicts_with = "uninstall")]
    pub install: bool,

    /// Uninstall hooks
    #[arg(long)]
    pub uninstall: bool,

    /// Replace hooks that were not written by docmirror
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Write the default configuration file
    #[arg(long, conflicts_with = "show")]
    pub init: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
