//! DocMirror - stale documentation notifier
//!
//! Run by a post-merge / post-rewrite hook after every repository update,
//! or by hand to check a revision range or the whole monitored tree.

use docmirror::cli::{check, config, hooks, notify, run_silently, status, Cli, Commands};
use docmirror::stale::stale_records;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Exit status for `check --exit-code` when stale documentation was found
const EXIT_STALE: u8 = 1;
/// Exit status for errors in the manual commands
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Setup logging; stdout is reserved for the report
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if let Commands::Hook(args) = &cli.command {
        // The update that triggered us must never see a failure
        run_silently(|| notify(&args.repo_root, cli.format));
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute a manual command
fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let repo_path = cli.path.as_path();

    match &cli.command {
        Commands::Hook(args) => {
            notify(&args.repo_root, cli.format);
        }

        Commands::Check(args) => {
            let records = check(
                repo_path,
                args.range.as_deref(),
                args.full,
                args.write_manifest,
                cli.format,
            )?;

            if args.exit_code && stale_records(&records).next().is_some() {
                return Ok(ExitCode::from(EXIT_STALE));
            }
        }

        Commands::Status(args) => {
            status(repo_path, args.clear, cli.format)?;
        }

        Commands::Hooks(args) => {
            hooks(repo_path, args.install, args.uninstall, args.force)?;
        }

        Commands::Config(args) => {
            config(repo_path, args.init, cli.format)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
