// tests/release_test.rs
use git_release::cli::{
    preview, run_release, PushOutcome, ReleaseEnv, ReleaseMachine, ReleaseOptions, ReleaseState,
};
use git_release::config::Config;
use git_release::domain::{BumpKind, RawCommit};
use git_release::git::MockRepository;
use git_release::store::{MemoryChangelog, MemoryManifest};
use git_release::ReleaseError;

fn scenario() -> MockRepository {
    MockRepository::new()
        .with_marker("v1.2.3")
        .with_remote("origin", "https://github.com/acme/tool.git")
        .with_commit("feat: add export")
        .with_commit("fix: null pointer")
        .with_commit("feat!: drop legacy API")
}

fn env<'a>(
    repo: &'a MockRepository,
    manifest: &'a MemoryManifest,
    changelog: &'a MemoryChangelog,
    config: &'a Config,
) -> ReleaseEnv<'a> {
    ReleaseEnv {
        repo,
        manifest,
        changelog,
        config,
    }
}

fn position(text: &str, needle: &str) -> usize {
    text.find(needle)
        .unwrap_or_else(|| panic!("{:?} not found in:\n{}", needle, text))
}

#[test]
fn test_full_release_breaking_bumps_major() {
    let repo = scenario();
    let manifest = MemoryManifest::new("1.2.3");
    let changelog = MemoryChangelog::default();
    let config = Config::default();

    let report = run_release(
        env(&repo, &manifest, &changelog, &config),
        ReleaseOptions::default(),
    )
    .unwrap();

    assert_eq!(report.state, ReleaseState::Done);
    assert_eq!(report.version.as_deref(), Some("2.0.0"));
    assert_eq!(report.bump_type, Some(BumpKind::Major));
    assert_eq!(manifest.version().as_deref(), Some("2.0.0"));

    let text = changelog.text().unwrap();
    assert!(text.starts_with("# Changelog"));
    let breaking = position(&text, "### BREAKING CHANGES");
    let features = position(&text, "### Features");
    let fixes = position(&text, "### Bug Fixes");
    assert!(breaking < features && features < fixes);
    assert!(text.contains("- drop legacy API\n"));
    assert!(text.contains("- add export (0000000)"));
    assert!(text.contains(
        "[2.0.0]: https://github.com/acme/tool/compare/v1.2.3...v2.0.0"
    ));

    let commits = repo.recorded_commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].message, "chore(release): v2.0.0");
    assert_eq!(commits[0].paths, vec!["package.json", "CHANGELOG.md"]);

    let annotation = repo.tag_message("v2.0.0").unwrap();
    assert!(annotation.starts_with("Release v2.0.0\n\n## [2.0.0]"));

    assert_eq!(
        repo.pushed_tags(),
        vec![("v2.0.0".to_string(), "origin".to_string())]
    );
    assert_eq!(report.push, PushOutcome::Pushed("origin".to_string()));
}

#[test]
fn test_forced_patch_still_renders_breaking_section() {
    let repo = scenario();
    let manifest = MemoryManifest::new("1.2.3");
    let changelog = MemoryChangelog::default();
    let config = Config::default();
    let options = ReleaseOptions {
        force: Some(BumpKind::Patch),
        ..ReleaseOptions::default()
    };

    let report = run_release(env(&repo, &manifest, &changelog, &config), options).unwrap();

    assert_eq!(report.version.as_deref(), Some("1.2.4"));
    assert!(report.forced);
    assert_eq!(report.breaking_count, 1);
    assert!(changelog
        .text()
        .unwrap()
        .contains("### BREAKING CHANGES"));
    assert!(repo.tag_message("v1.2.4").is_some());
}

#[test]
fn test_dry_run_has_no_effects() {
    let repo = scenario();
    let manifest = MemoryManifest::new("1.2.3");
    let changelog = MemoryChangelog::new("# Changelog\n\n## [1.2.3] - 2024-01-01\n");
    let config = Config::default();
    let options = ReleaseOptions {
        dry_run: true,
        ..ReleaseOptions::default()
    };

    let report = run_release(env(&repo, &manifest, &changelog, &config), options).unwrap();

    assert_eq!(report.state, ReleaseState::Done);
    assert_eq!(manifest.version().as_deref(), Some("1.2.3"));
    assert_eq!(
        changelog.text().as_deref(),
        Some("# Changelog\n\n## [1.2.3] - 2024-01-01\n")
    );
    assert!(repo.recorded_commits().is_empty());
    assert!(repo.tag_message("v2.0.0").is_none());
    assert!(repo.pushed_tags().is_empty());
    assert_eq!(report.push, PushOutcome::Skipped("dry run".to_string()));

    // what would have been written is still reported
    let planned = report.changelog_file.unwrap();
    assert!(position(&planned, "## [2.0.0]") < position(&planned, "## [1.2.3]"));
    assert_eq!(
        report.commit_message.as_deref(),
        Some("chore(release): v2.0.0")
    );
}

#[test]
fn test_dry_run_still_checks_tag_existence() {
    let repo = scenario().with_tag("v2.0.0");
    let manifest = MemoryManifest::new("1.2.3");
    let changelog = MemoryChangelog::default();
    let config = Config::default();
    let options = ReleaseOptions {
        dry_run: true,
        ..ReleaseOptions::default()
    };

    let mut machine = ReleaseMachine::new(env(&repo, &manifest, &changelog, &config), options);
    let err = machine.run().unwrap_err();

    assert!(matches!(err, ReleaseError::TagAlreadyExists(ref tag) if tag == "v2.0.0"));
    assert_eq!(machine.state(), ReleaseState::Committed);
    assert!(repo.recorded_commits().is_empty());
}

#[test]
fn test_existing_tag_fails_after_commit() {
    let repo = scenario().with_tag("v2.0.0");
    let manifest = MemoryManifest::new("1.2.3");
    let changelog = MemoryChangelog::default();
    let config = Config::default();

    let mut machine = ReleaseMachine::new(
        env(&repo, &manifest, &changelog, &config),
        ReleaseOptions::default(),
    );
    let err = machine.run().unwrap_err();

    assert!(matches!(err, ReleaseError::TagAlreadyExists(_)));
    // earlier transitions are not rolled back
    assert_eq!(machine.state(), ReleaseState::Committed);
    assert_eq!(manifest.version().as_deref(), Some("2.0.0"));
    assert_eq!(repo.recorded_commits().len(), 1);
    assert!(repo.pushed_tags().is_empty());
}

#[test]
fn test_push_failure_leaves_tag_in_place() {
    let repo = scenario().failing_push("authentication required");
    let manifest = MemoryManifest::new("1.2.3");
    let changelog = MemoryChangelog::default();
    let config = Config::default();

    let mut machine = ReleaseMachine::new(
        env(&repo, &manifest, &changelog, &config),
        ReleaseOptions::default(),
    );
    let err = machine.run().unwrap_err();

    match err {
        ReleaseError::PushFailure { tag, remote, cause } => {
            assert_eq!(tag, "v2.0.0");
            assert_eq!(remote, "origin");
            assert_eq!(cause, "authentication required");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(machine.state(), ReleaseState::Tagged);
    assert!(repo.tag_message("v2.0.0").is_some());
}

#[test]
fn test_missing_remote_skips_push() {
    let repo = MockRepository::new()
        .with_marker("v0.3.0")
        .with_commit("fix: typo");
    let manifest = MemoryManifest::new("0.3.0");
    let changelog = MemoryChangelog::default();
    let config = Config::default();

    let report = run_release(
        env(&repo, &manifest, &changelog, &config),
        ReleaseOptions::default(),
    )
    .unwrap();

    assert_eq!(report.state, ReleaseState::Done);
    assert!(matches!(report.push, PushOutcome::Skipped(_)));
    // the skipped push is the only report of the missing remote
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].starts_with("Tag push skipped"));
    // without a remote the footer link stays relative
    assert!(changelog
        .text()
        .unwrap()
        .contains("[0.3.1]: compare/v0.3.0...v0.3.1"));
}

#[test]
fn test_missing_remote_reported_once_without_push() {
    for (dry_run, push) in [(true, true), (false, false)] {
        let repo = MockRepository::new()
            .with_marker("v0.3.0")
            .with_commit("fix: typo");
        let manifest = MemoryManifest::new("0.3.0");
        let changelog = MemoryChangelog::default();
        let config = Config::default();
        let options = ReleaseOptions {
            dry_run,
            push,
            ..ReleaseOptions::default()
        };

        let report = run_release(env(&repo, &manifest, &changelog, &config), options).unwrap();

        assert_eq!(report.warnings.len(), 1, "dry_run={} push={}", dry_run, push);
        assert!(report.warnings[0].contains("Remote 'origin' is not configured"));
    }
}

#[test]
fn test_no_push_option() {
    let repo = scenario();
    let manifest = MemoryManifest::new("1.2.3");
    let changelog = MemoryChangelog::default();
    let config = Config::default();
    let options = ReleaseOptions {
        push: false,
        ..ReleaseOptions::default()
    };

    let report = run_release(env(&repo, &manifest, &changelog, &config), options).unwrap();

    assert!(repo.pushed_tags().is_empty());
    assert_eq!(report.push, PushOutcome::Skipped("push disabled".to_string()));
    assert!(repo.tag_message("v2.0.0").is_some());
}

#[test]
fn test_first_release_without_tag() {
    let repo = MockRepository::new()
        .with_remote("origin", "git@github.com:acme/tool.git")
        .with_commit("chore: initial commit")
        .with_commit("docs: readme");
    let manifest = MemoryManifest::new("0.0.0");
    let changelog = MemoryChangelog::default();
    let config = Config::default();

    let report = run_release(
        env(&repo, &manifest, &changelog, &config),
        ReleaseOptions::default(),
    )
    .unwrap();

    assert_eq!(report.version.as_deref(), Some("0.0.1"));
    assert_eq!(report.previous_tag, None);
    assert!(report.warnings.iter().any(|w| w.contains("No release tag")));
    assert!(changelog
        .text()
        .unwrap()
        .contains("[0.0.1]: https://github.com/acme/tool/releases/tag/v0.0.1"));
}

#[test]
fn test_existing_changelog_keeps_prior_sections_once() {
    let repo = scenario();
    let manifest = MemoryManifest::new("1.2.3");
    let changelog = MemoryChangelog::new(
        "# Changelog\n\nSome old preamble.\n\n## [1.2.3] - 2024-01-01\n\n### Features\n\n- older\n",
    );
    let config = Config::default();

    run_release(
        env(&repo, &manifest, &changelog, &config),
        ReleaseOptions::default(),
    )
    .unwrap();

    let text = changelog.text().unwrap();
    assert_eq!(text.matches("# Changelog").count(), 1);
    assert!(!text.contains("Some old preamble."));
    assert!(position(&text, "## [2.0.0]") < position(&text, "## [1.2.3]"));
    assert!(text.contains("- older"));
}

#[test]
fn test_unparseable_manifest_version_aborts() {
    let repo = scenario();
    let manifest = MemoryManifest::new("1.2.3-beta");
    let changelog = MemoryChangelog::default();
    let config = Config::default();

    let mut machine = ReleaseMachine::new(
        env(&repo, &manifest, &changelog, &config),
        ReleaseOptions::default(),
    );
    assert!(matches!(
        machine.run(),
        Err(ReleaseError::InvalidVersion(_))
    ));
    assert_eq!(machine.state(), ReleaseState::Idle);
    assert!(changelog.text().is_none());
}

#[test]
fn test_missing_manifest_version_aborts() {
    let repo = scenario();
    let manifest = MemoryManifest::empty();
    let changelog = MemoryChangelog::default();
    let config = Config::default();

    let result = run_release(
        env(&repo, &manifest, &changelog, &config),
        ReleaseOptions::default(),
    );
    assert!(matches!(result, Err(ReleaseError::ManifestUnreadable(_))));
}

#[test]
fn test_preview_matches_release_section() {
    let repo = scenario();
    let manifest = MemoryManifest::new("1.2.3");
    let config = Config::default();

    let preview = preview(&repo, &manifest, &config, None).unwrap();

    assert_eq!(preview.version, "2.0.0");
    assert!(preview.breaking);
    assert_eq!(preview.commits.len(), 3);
    assert_eq!(preview.previous_tag.as_deref(), Some("v1.2.3"));
    assert!(preview.changelog.contains("### BREAKING CHANGES"));
}

#[test]
fn test_breaking_footer_in_body_bumps_major() {
    let repo = MockRepository::new()
        .with_marker("v3.1.0")
        .with_record(RawCommit::new(
            "1234567890abcdef",
            "refactor(config): rename keys",
            "Keys now use snake_case.\n\nBREAKING CHANGE: old keys are rejected",
        ))
        .with_commit("not a conventional subject");
    let manifest = MemoryManifest::new("v3.1.0");
    let changelog = MemoryChangelog::default();
    let config = Config::default();

    let report = run_release(
        env(&repo, &manifest, &changelog, &config),
        ReleaseOptions::default(),
    )
    .unwrap();

    assert_eq!(report.version.as_deref(), Some("4.0.0"));
    let text = changelog.text().unwrap();
    assert!(text.contains("### BREAKING CHANGES\n\n- **config**: rename keys\n"));
    assert!(text.contains("### Other Changes\n\n- not a conventional subject"));
}
