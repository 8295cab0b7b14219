//! Preview and bump workflows
//!
//! Both reuse the first transitions of the release machine without any of
//! its git effects.

use serde::Serialize;
use tracing::info;

use super::orchestration::{build_changelog, plan_version, reference_links, VersionPlan};
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{BumpKind, ClassifiedCommit};
use crate::error::Result;
use crate::git::Repository;
use crate::store::ManifestStore;

/// Structured result of `changelog`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePreview {
    pub version: String,
    pub bump_type: BumpKind,
    pub breaking: bool,
    pub commits: Vec<ClassifiedCommit>,
    pub changelog: String,
    #[serde(skip)]
    pub previous_tag: Option<String>,
    #[serde(skip)]
    pub warnings: Vec<BoundaryWarning>,
}

/// Compute the next version and its changelog section without side effects
pub fn preview(
    repo: &dyn Repository,
    manifest: &dyn ManifestStore,
    config: &Config,
    force: Option<BumpKind>,
) -> Result<ReleasePreview> {
    let plan = plan_version(repo, manifest, force)?;
    let links = reference_links(repo, config);
    let document = build_changelog(&plan, &links);

    let breaking = plan.has_breaking();
    let VersionPlan {
        marker,
        commits,
        decision,
        next,
        warnings,
        ..
    } = plan;

    Ok(ReleasePreview {
        version: next,
        bump_type: decision.kind,
        breaking,
        commits,
        changelog: document.text,
        previous_tag: marker,
        warnings,
    })
}

/// Result of `bump`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpOutcome {
    pub previous: String,
    pub next: String,
    pub kind: BumpKind,
    pub forced: bool,
    /// Whether the manifest was updated
    pub written: bool,
    pub location: String,
}

/// Compute the next version and write it to the manifest unless `dry_run`
pub fn bump(
    repo: &dyn Repository,
    manifest: &dyn ManifestStore,
    force: Option<BumpKind>,
    dry_run: bool,
) -> Result<BumpOutcome> {
    let plan = plan_version(repo, manifest, force)?;

    if !dry_run {
        manifest.write_version(&plan.next)?;
        info!(version = %plan.next, "manifest version bumped");
    }

    Ok(BumpOutcome {
        previous: plan.current,
        next: plan.next,
        kind: plan.decision.kind,
        forced: plan.decision.forced,
        written: !dry_run,
        location: manifest.location(),
    })
}
