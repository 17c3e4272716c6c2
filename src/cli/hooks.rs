//! Git hook shim management

use crate::repo::Repository;
use anyhow::{Context, Result};
use std::path::Path;

/// Hooks that fire after the work tree has been updated
pub const HOOK_NAMES: [&str; 2] = ["post-merge", "post-rewrite"];

/// Marker identifying shims written by docmirror
pub const HOOK_MARKER: &str = "# docmirror hook";

const HOOK_CONTENT: &str = r#"#!/bin/sh
# docmirror hook: flag mirrored documentation that may be stale
# post-rewrite passes "amend" for commit --amend, which updates nothing
[ "$1" = "amend" ] && exit 0
command -v docmirror >/dev/null 2>&1 || exit 0
docmirror hook "$(git rev-parse --show-toplevel)" || true
exit 0
"#;

/// Install, uninstall or report the docmirror hooks
pub fn hooks(path: &Path, install: bool, uninstall: bool, force: bool) -> Result<()> {
    let repo = Repository::open(path)?;
    let hooks_dir = repo.hooks_dir();
    tracing::debug!("Hooks directory: {:?}", hooks_dir);

    if install {
        std::fs::create_dir_all(&hooks_dir)
            .with_context(|| format!("Failed to create {:?}", hooks_dir))?;

        for name in HOOK_NAMES {
            let hook = hooks_dir.join(name);

            if hook.exists() && !is_ours(&hook) && !force {
                anyhow::bail!(
                    "{} hook already exists at {:?}; use --force to replace it",
                    name,
                    hook
                );
            }

            std::fs::write(&hook, HOOK_CONTENT)
                .with_context(|| format!("Failed to write {:?}", hook))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let mut perms = std::fs::metadata(&hook)?.permissions();
                perms.set_mode(0o755);
                std::fs::set_permissions(&hook, perms)?;
            }

            println!("✓ Installed {} hook", name);
        }
    }

    if uninstall {
        for name in HOOK_NAMES {
            let hook = hooks_dir.join(name);
            if !hook.exists() {
                continue;
            }
            if is_ours(&hook) {
                std::fs::remove_file(&hook)
                    .with_context(|| format!("Failed to remove {:?}", hook))?;
                println!("✓ Removed {} hook", name);
            } else {
                println!("Left {} hook in place (not installed by docmirror)", name);
            }
        }
    }

    if !install && !uninstall {
        for name in HOOK_NAMES {
            let hook = hooks_dir.join(name);
            let state = if !hook.exists() {
                "not installed"
            } else if is_ours(&hook) {
                "installed"
            } else {
                "foreign hook present"
            };
            println!("{} hook: {}", name, state);
        }
    }

    Ok(())
}

fn is_ours(hook: &Path) -> bool {
    std::fs::read_to_string(hook)
        .map(|content| content.contains(HOOK_MARKER))
        .unwrap_or(false)
}
