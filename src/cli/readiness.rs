//! Release readiness checks behind `check`

use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::domain::BranchContext;
use crate::git::Repository;

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// A single readiness check result
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.to_string(),
            status,
            message: message.into(),
        }
    }
}

/// Full readiness report
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    pub checks: Vec<CheckResult>,
    /// True when no check failed; warnings do not block a release
    pub ready: bool,
}

/// Run every readiness check. Query failures become failed checks.
#[instrument(skip(repo, config))]
pub fn check_readiness(repo: &dyn Repository, config: &Config) -> ReadinessReport {
    let checks = vec![
        check_clean_tree(repo),
        check_release_branch(repo, &config.main_branches),
        check_remote(repo, &config.remote),
    ];

    let ready = checks.iter().all(|c| c.status != CheckStatus::Fail);
    debug!(ready, "readiness checks complete");

    ReadinessReport { checks, ready }
}

fn check_clean_tree(repo: &dyn Repository) -> CheckResult {
    const NAME: &str = "Working tree";
    match repo.working_tree_clean() {
        Ok(true) => CheckResult::new(NAME, CheckStatus::Pass, "Clean working tree"),
        Ok(false) => CheckResult::new(
            NAME,
            CheckStatus::Fail,
            "Uncommitted changes in working tree",
        ),
        Err(e) => CheckResult::new(NAME, CheckStatus::Fail, format!("Failed to check: {}", e)),
    }
}

fn check_release_branch(repo: &dyn Repository, main_branches: &[String]) -> CheckResult {
    const NAME: &str = "Release branch";
    match repo.current_branch() {
        Ok(name) => {
            let branch = BranchContext::new(name, main_branches);
            if branch.is_release_branch() {
                CheckResult::new(NAME, CheckStatus::Pass, format!("On '{}'", branch.name))
            } else {
                CheckResult::new(
                    NAME,
                    CheckStatus::Fail,
                    format!(
                        "On '{}', expected one of: {}",
                        branch.name,
                        main_branches.join(", ")
                    ),
                )
            }
        }
        Err(e) => CheckResult::new(
            NAME,
            CheckStatus::Fail,
            format!("Cannot determine branch: {}", e),
        ),
    }
}

fn check_remote(repo: &dyn Repository, remote: &str) -> CheckResult {
    const NAME: &str = "Remote";
    match repo.has_remote(remote) {
        Ok(true) => CheckResult::new(NAME, CheckStatus::Pass, format!("Remote '{}' found", remote)),
        Ok(false) => CheckResult::new(
            NAME,
            CheckStatus::Warn,
            format!("Remote '{}' not configured; tags will not be pushed", remote),
        ),
        Err(e) => CheckResult::new(NAME, CheckStatus::Warn, format!("Failed to check: {}", e)),
    }
}
