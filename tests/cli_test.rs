// tests/cli_test.rs
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use git2::{Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

fn git_release(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_git-release"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute git-release")
}

/// Repository on `main` with a manifest at `version` and one commit per message
fn project(version: &str, messages: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    let mut options = RepositoryInitOptions::new();
    options.initial_head("main");
    let repo = Repository::init_opts(dir.path(), &options).unwrap();
    let signature = Signature::now("Release Bot", "release@example.com").unwrap();

    fs::write(
        dir.path().join("package.json"),
        format!("{{\n  \"version\": \"{}\"\n}}\n", version),
    )
    .unwrap();

    for (i, message) in messages.iter().enumerate() {
        if i > 0 {
            fs::write(dir.path().join("notes.txt"), message).unwrap();
        }
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap();
    }

    dir
}

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    let output = git_release(dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    for command in ["release", "changelog", "bump", "check"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

#[test]
fn test_changelog_json() {
    let dir = project("1.2.3", &["feat: add export", "fix: null pointer"]);
    let output = git_release(dir.path(), &["changelog", "--json"]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["version"], "1.3.0");
    assert_eq!(value["bumpType"], "minor");
    assert_eq!(value["breaking"], false);
    assert_eq!(value["commits"].as_array().unwrap().len(), 2);
    assert_eq!(value["commits"][1]["type"], "fix");
}

#[test]
fn test_check_fails_on_dirty_tree() {
    let dir = project("1.0.0", &["chore: initial"]);
    fs::write(dir.path().join("scratch.txt"), "wip").unwrap();

    let output = git_release(dir.path(), &["check"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Uncommitted changes"));
}

#[test]
fn test_check_passes_without_remote() {
    let dir = project("1.0.0", &["chore: initial"]);

    let output = git_release(dir.path(), &["check"]);
    assert!(output.status.success());
}

#[test]
fn test_bad_manifest_version_prints_single_error() {
    let dir = project("1.2", &["feat: x"]);

    let output = git_release(dir.path(), &["release", "--dry-run"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8(output.stderr).unwrap();
    let errors: Vec<&str> = stderr.lines().filter(|l| l.contains("ERROR:")).collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Invalid version"));
}

#[test]
fn test_bump_forced_writes_manifest() {
    let dir = project("0.4.1", &["chore: initial"]);

    let output = git_release(dir.path(), &["bump", "--force", "major"]);
    assert!(output.status.success());

    let manifest = fs::read_to_string(dir.path().join("package.json")).unwrap();
    assert!(manifest.contains("\"version\": \"1.0.0\""));
}
