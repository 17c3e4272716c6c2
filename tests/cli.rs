use assert_cmd::Command;
use git2::{IndexAddOption, Oid, Repository, Signature};
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn commit_all(repo: &Repository, message: &str) -> Oid {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap();
    index.update_all(["*"].iter(), None).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("Test", "test@example.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

/// A repository where the last update (ORIG_HEAD → HEAD) touched `changed`
fn updated_repo(changed: &[&str], docs: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    let repo = Repository::init(dir.path()).unwrap();

    write_file(dir.path(), "src/keep.rs", "fn keep() {}");
    for doc in docs {
        write_file(dir.path(), doc, "# docs");
    }
    let before = commit_all(&repo, "initial");

    for path in changed {
        write_file(dir.path(), path, "fn changed() {}");
    }
    commit_all(&repo, "update");
    std::fs::write(repo.path().join("ORIG_HEAD"), format!("{}\n", before)).unwrap();

    dir
}

fn manifest_path(root: &Path) -> std::path::PathBuf {
    root.join(".git").join("docmirror").join("stale-docs.txt")
}

fn docmirror() -> Command {
    let mut cmd = Command::cargo_bin("docmirror").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn hook_reports_existing_documentation() {
    let dir = updated_repo(&["src/lib/a.rs"], &["docs/src/lib/a.rs.md"]);

    docmirror()
        .arg("hook")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("src/lib/a.rs → docs/src/lib/a.rs.md"))
        .stdout(predicate::str::contains(
            "for these changed files: src/lib/a.rs",
        ));

    let manifest = std::fs::read_to_string(manifest_path(dir.path())).unwrap();
    assert_eq!(manifest, "src/lib/a.rs\n");
}

#[test]
fn hook_is_silent_without_documentation() {
    let dir = updated_repo(&["src/lib/b.rs"], &[]);

    docmirror()
        .arg("hook")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(!manifest_path(dir.path()).exists());
}

#[test]
fn hook_ignores_unmonitored_paths() {
    let dir = updated_repo(&["other/unmonitored.rs"], &["docs/other/unmonitored.rs.md"]);

    docmirror()
        .arg("hook")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(!manifest_path(dir.path()).exists());
}

#[test]
fn hook_succeeds_without_previous_revision() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    write_file(dir.path(), "src/lib/a.rs", "fn a() {}");
    write_file(dir.path(), "docs/src/lib/a.rs.md", "# a");
    commit_all(&repo, "only");

    docmirror()
        .arg("hook")
        .arg(dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());

    assert!(!manifest_path(dir.path()).exists());
}

#[test]
fn hook_succeeds_outside_a_repository() {
    let dir = TempDir::new().unwrap();

    docmirror()
        .arg("hook")
        .arg(dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn hook_logs_misconfiguration_once() {
    let dir = updated_repo(&["src/lib/a.rs"], &["docs/src/lib/a.rs.md"]);
    write_file(
        dir.path(),
        ".docmirror/config.toml",
        "source_root = \"missing\"\n",
    );

    docmirror()
        .arg("hook")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("misconfigured").count(1));
}

#[test]
fn check_exit_code_signals_staleness() {
    let dir = updated_repo(&["src/lib/a.rs"], &["docs/src/lib/a.rs.md"]);

    docmirror()
        .args(["check", "--exit-code", "-p"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("src/lib/a.rs → docs/src/lib/a.rs.md"));

    // check leaves the manifest alone unless asked
    assert!(!manifest_path(dir.path()).exists());

    let clean = updated_repo(&["src/lib/b.rs"], &[]);
    docmirror()
        .args(["check", "--exit-code", "-p"])
        .arg(clean.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("No stale documentation"));
}

#[test]
fn check_json_output() {
    let dir = updated_repo(&["src/lib/a.rs"], &["docs/src/lib/a.rs.md"]);

    let output = docmirror()
        .args(["check", "-o", "json", "-p"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["stale"][0]["source_path"], "src/lib/a.rs");
    assert_eq!(value["stale"][0]["doc_path"], "docs/src/lib/a.rs.md");
}

#[test]
fn check_outside_repository_fails() {
    let dir = TempDir::new().unwrap();

    docmirror()
        .args(["check", "-p"])
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn status_lists_then_clears_manifest() {
    let dir = updated_repo(&["src/lib/a.rs"], &["docs/src/lib/a.rs.md"]);
    docmirror().arg("hook").arg(dir.path()).assert().success();

    docmirror()
        .args(["status", "-p"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("src/lib/a.rs"));

    docmirror()
        .args(["status", "--clear", "-p"])
        .arg(dir.path())
        .assert()
        .success();
    assert!(!manifest_path(dir.path()).exists());
}

#[test]
fn hooks_install_writes_shims() {
    let dir = TempDir::new().unwrap();
    Repository::init(dir.path()).unwrap();

    docmirror()
        .args(["hooks", "--install", "-p"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed post-merge hook"));

    let shim = std::fs::read_to_string(dir.path().join(".git/hooks/post-merge")).unwrap();
    assert!(shim.contains("docmirror hook"));
}
