use std::cell::RefCell;
use std::collections::HashMap;

use crate::domain::RawCommit;
use crate::error::{ReleaseError, Result};
use crate::git::Repository;

/// A commit recorded by [`MockRepository::commit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommit {
    pub paths: Vec<String>,
    pub message: String,
}

/// Mock repository for testing without actual git operations
///
/// Queries answer from the configured state; mutating calls are recorded and
/// can be inspected afterwards.
pub struct MockRepository {
    marker: Option<String>,
    records: Vec<RawCommit>,
    remotes: HashMap<String, String>,
    branch: Option<String>,
    clean: bool,
    available: bool,
    push_error: Option<String>,
    tags: RefCell<HashMap<String, String>>,
    pushed: RefCell<Vec<(String, String)>>,
    commits: RefCell<Vec<RecordedCommit>>,
}

impl MockRepository {
    /// Create a new empty mock repository on a clean `main` branch
    pub fn new() -> Self {
        MockRepository {
            marker: None,
            records: Vec::new(),
            remotes: HashMap::new(),
            branch: Some("main".to_string()),
            clean: true,
            available: true,
            push_error: None,
            tags: RefCell::new(HashMap::new()),
            pushed: RefCell::new(Vec::new()),
            commits: RefCell::new(Vec::new()),
        }
    }

    /// Set the last release marker; the tag is also registered as existing
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        self.tags
            .get_mut()
            .insert(marker.clone(), format!("Release {}", marker));
        self.marker = Some(marker);
        self
    }

    /// Append a commit record; its id is derived from its position
    pub fn with_commit(mut self, message: &str) -> Self {
        let id = format!("{:040x}", self.records.len() + 1);
        self.records.push(RawCommit::from_message(id, message));
        self
    }

    /// Append a fully specified record
    pub fn with_record(mut self, record: RawCommit) -> Self {
        self.records.push(record);
        self
    }

    pub fn with_remote(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.remotes.insert(name.into(), url.into());
        self
    }

    pub fn with_tag(self, name: impl Into<String>) -> Self {
        self.tags.borrow_mut().insert(name.into(), String::new());
        self
    }

    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Detached HEAD: the current branch cannot be determined
    pub fn detached(mut self) -> Self {
        self.branch = None;
        self
    }

    pub fn dirty(mut self) -> Self {
        self.clean = false;
        self
    }

    /// Every query fails as if there were no repository
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Make every push fail with `cause`
    pub fn failing_push(mut self, cause: impl Into<String>) -> Self {
        self.push_error = Some(cause.into());
        self
    }

    /// Annotation message of a tag created through the trait
    pub fn tag_message(&self, name: &str) -> Option<String> {
        self.tags.borrow().get(name).cloned()
    }

    pub fn pushed_tags(&self) -> Vec<(String, String)> {
        self.pushed.borrow().clone()
    }

    pub fn recorded_commits(&self) -> Vec<RecordedCommit> {
        self.commits.borrow().clone()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(ReleaseError::accessor("not a git repository"))
        }
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn last_marker(&self) -> Result<Option<String>> {
        self.ensure_available()?;
        Ok(self.marker.clone())
    }

    fn records_since(&self, _marker: Option<&str>) -> Result<Vec<RawCommit>> {
        self.ensure_available()?;
        Ok(self.records.clone())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        self.ensure_available()?;
        Ok(self.tags.borrow().contains_key(name))
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        self.ensure_available()?;
        let mut tags = self.tags.borrow_mut();
        if tags.contains_key(name) {
            return Err(ReleaseError::TagAlreadyExists(name.to_string()));
        }
        tags.insert(name.to_string(), message.to_string());
        Ok(())
    }

    fn has_remote(&self, name: &str) -> Result<bool> {
        self.ensure_available()?;
        Ok(self.remotes.contains_key(name))
    }

    fn remote_url(&self, name: &str) -> Result<Option<String>> {
        self.ensure_available()?;
        Ok(self.remotes.get(name).cloned())
    }

    fn push_tag(&self, name: &str, remote: &str) -> Result<()> {
        self.ensure_available()?;
        if !self.remotes.contains_key(remote) {
            return Err(ReleaseError::push(name, remote, "remote not found"));
        }
        if let Some(cause) = &self.push_error {
            return Err(ReleaseError::push(name, remote, cause));
        }
        self.pushed
            .borrow_mut()
            .push((name.to_string(), remote.to_string()));
        Ok(())
    }

    fn commit(&self, paths: &[String], message: &str) -> Result<()> {
        self.ensure_available()?;
        self.commits.borrow_mut().push(RecordedCommit {
            paths: paths.to_vec(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn working_tree_clean(&self) -> Result<bool> {
        self.ensure_available()?;
        Ok(self.clean)
    }

    fn current_branch(&self) -> Result<String> {
        self.ensure_available()?;
        self.branch
            .clone()
            .ok_or_else(|| ReleaseError::accessor("HEAD is detached"))
    }
}
