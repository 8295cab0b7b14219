use std::collections::HashMap;
use std::path::{Path, PathBuf};

use git2::{ErrorCode, Oid, Repository as Git2Repo, Sort, Status, StatusOptions};
use tracing::{debug, instrument, warn};

use crate::domain::RawCommit;
use crate::error::{ReleaseError, Result};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path.as_ref()).map_err(|e| {
            ReleaseError::accessor(format!(
                "not a git repository ({}): {}",
                path.as_ref().display(),
                e.message()
            ))
        })?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// HEAD commit id, `None` on an unborn branch
    fn head_oid(&self) -> Result<Option<Oid>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?.id())),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Commit each tag points at, peeling annotated tags
    fn tags_by_commit(&self) -> Result<HashMap<Oid, Vec<String>>> {
        let mut by_commit: HashMap<Oid, Vec<String>> = HashMap::new();
        let names = self.repo.tag_names(None)?;

        for name in names.iter().flatten() {
            let reference = match self.repo.find_reference(&format!("refs/tags/{}", name)) {
                Ok(r) => r,
                Err(_) => continue,
            };
            match reference.peel_to_commit() {
                Ok(commit) => by_commit
                    .entry(commit.id())
                    .or_default()
                    .push(name.to_string()),
                Err(e) => debug!(tag = name, error = %e, "tag does not point at a commit"),
            }
        }

        Ok(by_commit)
    }

    /// Path relative to the work tree, as the index expects
    fn index_path(&self, path: &str) -> Result<PathBuf> {
        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| ReleaseError::accessor("repository has no working directory"))?;
        let candidate = Path::new(path);

        let absolute = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            std::env::current_dir()?.join(candidate)
        };
        let absolute = absolute.canonicalize().unwrap_or(absolute);
        let workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());

        absolute
            .strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                ReleaseError::accessor(format!("{} is outside the repository", path))
            })
    }
}

/// Pick the newest of several tags on one commit, semver-aware
fn preferred_tag(mut tags: Vec<String>) -> Option<String> {
    tags.sort_by(|a, b| {
        let parse = |t: &str| semver::Version::parse(t.strip_prefix('v').unwrap_or(t)).ok();
        parse(a).cmp(&parse(b)).then_with(|| a.cmp(b))
    });
    tags.pop()
}

impl super::Repository for Git2Repository {
    #[instrument(skip(self))]
    fn last_marker(&self) -> Result<Option<String>> {
        let Some(head) = self.head_oid()? else {
            debug!("unborn HEAD, releasing from the beginning");
            return Ok(None);
        };

        let mut tags = self.tags_by_commit()?;
        if tags.is_empty() {
            return Ok(None);
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head)?;

        for oid in revwalk {
            let oid = oid?;
            if let Some(names) = tags.remove(&oid) {
                let marker = preferred_tag(names);
                debug!(?marker, "found last release marker");
                return Ok(marker);
            }
        }

        Ok(None)
    }

    #[instrument(skip(self))]
    fn records_since(&self, marker: Option<&str>) -> Result<Vec<RawCommit>> {
        let Some(head) = self.head_oid()? else {
            return Ok(Vec::new());
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head)?;

        if let Some(marker) = marker {
            let marker_commit = self
                .repo
                .find_reference(&format!("refs/tags/{}", marker))
                .and_then(|r| r.peel_to_commit())
                .map_err(|e| {
                    ReleaseError::accessor(format!(
                        "cannot resolve tag '{}': {}",
                        marker,
                        e.message()
                    ))
                })?;
            revwalk.hide(marker_commit.id())?;
        }

        let mut records = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            if commit.parent_count() > 1 {
                continue;
            }
            let message = String::from_utf8_lossy(commit.message_bytes());
            records.push(RawCommit::from_message(commit.id().to_string(), &message));
        }

        // Oldest first
        records.reverse();
        debug!(count = records.len(), "collected commit records");
        Ok(records)
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) if e.code() == ErrorCode::InvalidSpec => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, message))]
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        if self.tag_exists(name)? {
            return Err(ReleaseError::TagAlreadyExists(name.to_string()));
        }

        let head = self.repo.head()?.peel_to_commit()?;
        let signature = self.repo.signature()?;
        self.repo
            .tag(name, head.as_object(), &signature, message, false)
            .map_err(|e| {
                if e.code() == ErrorCode::Exists {
                    ReleaseError::TagAlreadyExists(name.to_string())
                } else {
                    e.into()
                }
            })?;

        Ok(())
    }

    fn has_remote(&self, name: &str) -> Result<bool> {
        match self.repo.find_remote(name) {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::InvalidSpec) => {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(str::to_string)),
            Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::InvalidSpec) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    fn push_tag(&self, name: &str, remote: &str) -> Result<()> {
        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::push(name, remote, e.message()))?;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }
                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }
            git2::Cred::default()
        });
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => {
                warn!(refname, status, "remote rejected reference");
                Err(git2::Error::from_str(&format!(
                    "remote rejected {}: {}",
                    refname, status
                )))
            }
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/tags/{}:refs/tags/{}", name, name);
        remote_handle
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| ReleaseError::push(name, remote, e.message()))?;

        Ok(())
    }

    #[instrument(skip(self))]
    fn commit(&self, paths: &[String], message: &str) -> Result<()> {
        let mut index = self.repo.index()?;
        for path in paths {
            index.add_path(&self.index_path(path)?)?;
        }
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let signature = self.repo.signature()?;
        let parent = match self.head_oid()? {
            Some(oid) => Some(self.repo.find_commit(oid)?),
            None => None,
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        debug!(%oid, "created release commit");
        Ok(())
    }

    fn working_tree_clean(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(true).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        let dirty = statuses
            .iter()
            .filter(|entry| !entry.status().contains(Status::IGNORED))
            .count();

        Ok(dirty == 0)
    }

    fn current_branch(&self) -> Result<String> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => head
                .shorthand()
                .map(str::to_string)
                .ok_or_else(|| ReleaseError::accessor("branch name is not valid UTF-8")),
            Ok(_) => Err(ReleaseError::accessor("HEAD is detached")),
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                // A fresh repository still names its branch through HEAD
                let head = self.repo.find_reference("HEAD")?;
                head.symbolic_target()
                    .and_then(|t| t.strip_prefix("refs/heads/"))
                    .map(str::to_string)
                    .ok_or_else(|| ReleaseError::accessor("cannot determine current branch"))
            }
            Err(e) => Err(ReleaseError::accessor(format!(
                "cannot determine current branch: {}",
                e.message()
            ))),
        }
    }
}
