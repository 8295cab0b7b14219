use std::fmt;

/// Warnings raised at the edges of a release run.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No commits since the last release tag
    NoNewCommits { marker: String },
    /// No release tag exists yet; history is read from the first commit
    NoPreviousTag,
    /// The configured remote does not exist
    RemoteMissing { remote: String },
    /// The tag was not pushed
    PushSkipped { reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoNewCommits { marker } => {
                write!(f, "No new commits since tag '{}'", marker)
            }
            BoundaryWarning::NoPreviousTag => {
                write!(f, "No release tag found; including all commits")
            }
            BoundaryWarning::RemoteMissing { remote } => {
                write!(f, "Remote '{}' is not configured", remote)
            }
            BoundaryWarning::PushSkipped { reason } => {
                write!(f, "Tag push skipped: {}", reason)
            }
        }
    }
}
