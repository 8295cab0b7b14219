//! Release workflow orchestration
//!
//! The release runs as an explicit state machine:
//!
//! `Idle → VersionComputed → ChangelogBuilt → FilesWritten → Committed →
//! Tagged → Pushed → Done`
//!
//! Each call to [`ReleaseMachine::step`] performs one transition against the
//! injected collaborators. A failing transition leaves the machine in the
//! last state it reached; nothing already done is rolled back.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::analyzer::{self, BumpDecision};
use crate::boundary::BoundaryWarning;
use crate::changelog::{self, ChangelogDocument, ReferenceLinks};
use crate::config::Config;
use crate::domain::{classify_all, next_version, BumpKind, ClassifiedCommit, Tag};
use crate::error::{ReleaseError, Result};
use crate::git::{self, Repository};
use crate::store::{ChangelogStore, ManifestStore};

/// Named states of a release run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseState {
    Idle,
    VersionComputed,
    ChangelogBuilt,
    FilesWritten,
    Committed,
    Tagged,
    Pushed,
    Done,
}

impl fmt::Display for ReleaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReleaseState::Idle => "idle",
            ReleaseState::VersionComputed => "version computed",
            ReleaseState::ChangelogBuilt => "changelog built",
            ReleaseState::FilesWritten => "files written",
            ReleaseState::Committed => "committed",
            ReleaseState::Tagged => "tagged",
            ReleaseState::Pushed => "pushed",
            ReleaseState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Caller choices for a release run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseOptions {
    /// Compute and validate everything, perform no mutation
    pub dry_run: bool,
    /// Bump to apply instead of the commit-derived one
    pub force: Option<BumpKind>,
    /// Push the tag after creating it
    pub push: bool,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        ReleaseOptions {
            dry_run: false,
            force: None,
            push: true,
        }
    }
}

/// What happened to the tag push
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "kebab-case")]
pub enum PushOutcome {
    /// Not reached yet
    Pending,
    /// Pushed to the named remote
    Pushed(String),
    /// Not attempted, with the reason
    Skipped(String),
}

/// Everything the first transition derives from history and the manifest
#[derive(Debug, Clone)]
pub struct VersionPlan {
    pub marker: Option<String>,
    pub commits: Vec<ClassifiedCommit>,
    pub current: String,
    pub decision: BumpDecision,
    pub next: String,
    pub warnings: Vec<BoundaryWarning>,
}

impl VersionPlan {
    pub fn tag(&self) -> Tag {
        Tag::for_version(&self.next)
    }

    pub fn has_breaking(&self) -> bool {
        self.commits.iter().any(|c| c.is_breaking)
    }
}

/// Read history and manifest, classify commits and compute the next version
#[instrument(skip(repo, manifest))]
pub fn plan_version(
    repo: &dyn Repository,
    manifest: &dyn ManifestStore,
    force: Option<BumpKind>,
) -> Result<VersionPlan> {
    let marker = repo.last_marker()?;
    let records = repo.records_since(marker.as_deref())?;
    let commits = classify_all(&records);

    let mut warnings = Vec::new();
    match &marker {
        None => warnings.push(BoundaryWarning::NoPreviousTag),
        Some(marker) if commits.is_empty() => warnings.push(BoundaryWarning::NoNewCommits {
            marker: marker.clone(),
        }),
        Some(_) => {}
    }

    let current = manifest.read_version()?;
    let decision = analyzer::resolve(&commits, force);
    let next = next_version(&current, decision.kind)?;

    info!(
        marker = marker.as_deref().unwrap_or("<none>"),
        commits = commits.len(),
        %current,
        %next,
        bump = %decision.kind,
        "version computed"
    );

    Ok(VersionPlan {
        marker,
        commits,
        current,
        decision,
        next,
        warnings,
    })
}

/// Link base for the changelog footer: configured URL, else the remote's web URL
pub fn reference_links(repo: &dyn Repository, config: &Config) -> ReferenceLinks {
    if let Some(url) = &config.repository_url {
        return ReferenceLinks::new(Some(url.clone()));
    }

    let remote = match repo.remote_url(&config.remote) {
        Ok(url) => url,
        Err(e) => {
            debug!(error = %e, "cannot read remote url");
            None
        }
    };
    ReferenceLinks::new(remote.as_deref().and_then(git::browse_url))
}

/// Render the changelog section for a plan
pub fn build_changelog(plan: &VersionPlan, links: &ReferenceLinks) -> ChangelogDocument {
    changelog::render(&plan.next, &plan.commits, plan.marker.as_deref(), links)
}

/// Commit message of the release commit
pub fn release_commit_message(version: &str) -> String {
    format!("chore(release): {}", Tag::for_version(version))
}

/// Summary of a release run, complete or interrupted
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseReport {
    pub state: ReleaseState,
    pub dry_run: bool,
    pub previous_tag: Option<String>,
    pub previous_version: Option<String>,
    pub version: Option<String>,
    pub tag: Option<String>,
    pub bump_type: Option<BumpKind>,
    pub forced: bool,
    pub commit_count: usize,
    pub breaking_count: usize,
    pub changelog: Option<String>,
    pub changelog_file: Option<String>,
    pub commit_message: Option<String>,
    pub push: PushOutcome,
    pub warnings: Vec<String>,
}

/// Collaborators a release runs against
pub struct ReleaseEnv<'a> {
    pub repo: &'a dyn Repository,
    pub manifest: &'a dyn ManifestStore,
    pub changelog: &'a dyn ChangelogStore,
    pub config: &'a Config,
}

/// The release state machine
pub struct ReleaseMachine<'a> {
    env: ReleaseEnv<'a>,
    options: ReleaseOptions,
    state: ReleaseState,
    plan: Option<VersionPlan>,
    document: Option<ChangelogDocument>,
    changelog_file: Option<String>,
    commit_message: Option<String>,
    push: PushOutcome,
    warnings: Vec<BoundaryWarning>,
}

impl<'a> ReleaseMachine<'a> {
    pub fn new(env: ReleaseEnv<'a>, options: ReleaseOptions) -> Self {
        ReleaseMachine {
            env,
            options,
            state: ReleaseState::Idle,
            plan: None,
            document: None,
            changelog_file: None,
            commit_message: None,
            push: PushOutcome::Pending,
            warnings: Vec::new(),
        }
    }

    /// Last state successfully reached
    pub fn state(&self) -> ReleaseState {
        self.state
    }

    pub fn plan(&self) -> Option<&VersionPlan> {
        self.plan.as_ref()
    }

    pub fn document(&self) -> Option<&ChangelogDocument> {
        self.document.as_ref()
    }

    pub fn warnings(&self) -> &[BoundaryWarning] {
        &self.warnings
    }

    /// Perform the next transition and return the state reached
    pub fn step(&mut self) -> Result<ReleaseState> {
        let next = match self.state {
            ReleaseState::Idle => self.compute_version()?,
            ReleaseState::VersionComputed => self.build_changelog()?,
            ReleaseState::ChangelogBuilt => self.write_files()?,
            ReleaseState::FilesWritten => self.commit()?,
            ReleaseState::Committed => self.tag()?,
            ReleaseState::Tagged => self.push_tag()?,
            ReleaseState::Pushed | ReleaseState::Done => ReleaseState::Done,
        };

        debug!(
            from = %self.state,
            to = %next,
            dry_run = self.options.dry_run,
            "release transition"
        );
        self.state = next;
        Ok(next)
    }

    /// Step until done or until a transition fails
    pub fn run(&mut self) -> Result<()> {
        while self.state != ReleaseState::Done {
            if let Err(e) = self.step() {
                debug!(state = %self.state, error = %e, "release aborted");
                return Err(e);
            }
        }
        Ok(())
    }

    fn plan_ref(&self) -> Result<&VersionPlan> {
        self.plan
            .as_ref()
            .ok_or_else(|| ReleaseError::config("release version has not been computed"))
    }

    fn document_ref(&self) -> Result<&ChangelogDocument> {
        self.document
            .as_ref()
            .ok_or_else(|| ReleaseError::config("release changelog has not been built"))
    }

    fn remote_present(&self) -> bool {
        self.env
            .repo
            .has_remote(&self.env.config.remote)
            .unwrap_or(false)
    }

    fn compute_version(&mut self) -> Result<ReleaseState> {
        let plan = plan_version(self.env.repo, self.env.manifest, self.options.force)?;
        self.warnings.extend(plan.warnings.iter().cloned());
        self.plan = Some(plan);
        Ok(ReleaseState::VersionComputed)
    }

    fn build_changelog(&mut self) -> Result<ReleaseState> {
        let links = reference_links(self.env.repo, self.env.config);
        // A real push reports the missing remote itself, as PushSkipped
        let push_reports = self.options.push && !self.options.dry_run;
        if links.base_url.is_none() && !push_reports && !self.remote_present() {
            self.warnings.push(BoundaryWarning::RemoteMissing {
                remote: self.env.config.remote.clone(),
            });
        }
        let document = build_changelog(self.plan_ref()?, &links);
        self.document = Some(document);
        Ok(ReleaseState::ChangelogBuilt)
    }

    fn write_files(&mut self) -> Result<ReleaseState> {
        let next = self.plan_ref()?.next.clone();
        let existing = self.env.changelog.read()?;
        let text = changelog::prepend_release(existing.as_deref(), self.document_ref()?.as_str());

        if self.options.dry_run {
            info!(version = %next, "dry run: changelog and manifest not written");
        } else {
            self.env.changelog.write(&text)?;
            self.env.manifest.write_version(&next)?;
            info!(version = %next, "changelog and manifest written");
        }

        self.changelog_file = Some(text);
        Ok(ReleaseState::FilesWritten)
    }

    fn commit(&mut self) -> Result<ReleaseState> {
        let message = release_commit_message(&self.plan_ref()?.next);

        if self.options.dry_run {
            info!(%message, "dry run: release commit not created");
        } else {
            let paths = vec![
                self.env.manifest.location(),
                self.env.changelog.location(),
            ];
            self.env.repo.commit(&paths, &message)?;
            info!(%message, "release commit created");
        }

        self.commit_message = Some(message);
        Ok(ReleaseState::Committed)
    }

    fn tag(&mut self) -> Result<ReleaseState> {
        let tag = self.plan_ref()?.tag();

        if self.env.repo.tag_exists(&tag.name)? {
            return Err(ReleaseError::TagAlreadyExists(tag.name));
        }

        if self.options.dry_run {
            info!(%tag, "dry run: tag not created");
        } else {
            let message = tag.annotation(
                self.document_ref()?.as_str(),
                self.env.config.tag_message_excerpt,
            );
            self.env.repo.create_annotated_tag(&tag.name, &message)?;
            info!(%tag, "annotated tag created");
        }

        Ok(ReleaseState::Tagged)
    }

    fn push_tag(&mut self) -> Result<ReleaseState> {
        let tag = self.plan_ref()?.tag();
        let remote = self.env.config.remote.clone();

        if !self.options.push {
            self.push = PushOutcome::Skipped("push disabled".to_string());
            return Ok(ReleaseState::Done);
        }
        if self.options.dry_run {
            self.push = PushOutcome::Skipped("dry run".to_string());
            return Ok(ReleaseState::Done);
        }
        if !self.env.repo.has_remote(&remote)? {
            let reason = format!("remote '{}' is not configured", remote);
            self.warnings.push(BoundaryWarning::PushSkipped {
                reason: reason.clone(),
            });
            self.push = PushOutcome::Skipped(reason);
            return Ok(ReleaseState::Done);
        }

        self.env.repo.push_tag(&tag.name, &remote)?;
        info!(%tag, %remote, "tag pushed");
        self.push = PushOutcome::Pushed(remote);
        Ok(ReleaseState::Pushed)
    }

    /// Snapshot of what the run computed and did so far
    pub fn report(&self) -> ReleaseReport {
        let plan = self.plan.as_ref();
        ReleaseReport {
            state: self.state,
            dry_run: self.options.dry_run,
            previous_tag: plan.and_then(|p| p.marker.clone()),
            previous_version: plan.map(|p| p.current.clone()),
            version: plan.map(|p| p.next.clone()),
            tag: plan.map(|p| p.tag().name),
            bump_type: plan.map(|p| p.decision.kind),
            forced: plan.is_some_and(|p| p.decision.forced),
            commit_count: plan.map_or(0, |p| p.commits.len()),
            breaking_count: plan.map_or(0, |p| p.commits.iter().filter(|c| c.is_breaking).count()),
            changelog: self.document.as_ref().map(|d| d.text.clone()),
            changelog_file: self.changelog_file.clone(),
            commit_message: self.commit_message.clone(),
            push: self.push.clone(),
            warnings: self.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Run a full release
pub fn run_release(env: ReleaseEnv<'_>, options: ReleaseOptions) -> Result<ReleaseReport> {
    let mut machine = ReleaseMachine::new(env, options);
    machine.run()?;
    Ok(machine.report())
}
