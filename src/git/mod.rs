//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the version-control
//! queries and effects a release needs, so the workflow can run against a
//! real repository or a scripted one.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation that records effects
//!
//! # Usage
//!
//! Workflow code depends on the [Repository] trait only.
//!
//! ```rust
//! # use git_release::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_release::Result<()> {
//! let marker = repo.last_marker()?;
//! let records = repo.records_since(marker.as_deref())?;
//! println!("{} commits since {:?}", records.len(), marker);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::RawCommit;
use crate::error::Result;

/// Version-control queries and effects used by the release workflow
///
/// ## Error Handling
///
/// Implementations map their underlying errors to
/// [crate::error::ReleaseError]. Queries that have a sensible default (no
/// tags yet, unborn branch) return it instead of failing.
pub trait Repository {
    /// Most recent release tag reachable from HEAD, `None` when there is none
    fn last_marker(&self) -> Result<Option<String>>;

    /// Non-merge commits after `marker` (all commits when `None`), oldest first
    fn records_since(&self, marker: Option<&str>) -> Result<Vec<RawCommit>>;

    /// Whether a tag with this name exists
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Create an annotated tag on HEAD. Fails with `TagAlreadyExists` if present.
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Whether a remote with this name is configured
    fn has_remote(&self, name: &str) -> Result<bool>;

    /// Fetch URL of a remote, if configured
    fn remote_url(&self, name: &str) -> Result<Option<String>>;

    /// Push one tag to a remote. Failures surface as `PushFailure`.
    fn push_tag(&self, name: &str, remote: &str) -> Result<()>;

    /// Stage `paths` and commit them on HEAD
    fn commit(&self, paths: &[String], message: &str) -> Result<()>;

    /// Whether the working tree has no tracked or untracked changes
    fn working_tree_clean(&self) -> Result<bool>;

    /// Short name of the checked-out branch
    fn current_branch(&self) -> Result<String>;
}

/// Turn a remote URL into a browsable `https://host/owner/repo` base
///
/// Handles `git@host:owner/repo.git`, `ssh://git@host/owner/repo.git` and
/// `https://host/owner/repo.git`. Returns `None` for anything else.
pub fn browse_url(remote_url: &str) -> Option<String> {
    let url = remote_url.trim();
    let url = url.strip_suffix(".git").unwrap_or(url);

    let (host, path) = if let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    {
        let rest = rest.rsplit_once('@').map(|(_, r)| r).unwrap_or(rest);
        rest.split_once('/')?
    } else if let Some(rest) = url.strip_prefix("ssh://") {
        let rest = rest.rsplit_once('@').map(|(_, r)| r).unwrap_or(rest);
        let (host, path) = rest.split_once('/')?;
        (host.split(':').next().unwrap_or(host), path)
    } else if let Some((user_host, path)) = url.split_once(':') {
        let host = user_host.rsplit_once('@').map(|(_, h)| h).unwrap_or(user_host);
        if host.contains('/') {
            return None;
        }
        (host, path)
    } else {
        return None;
    };

    let path = path.trim_matches('/');
    if host.is_empty() || path.is_empty() {
        return None;
    }
    Some(format!("https://{}/{}", host, path))
}
