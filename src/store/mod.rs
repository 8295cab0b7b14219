//! Persistence for the package manifest and the changelog file
//!
//! The release workflow only sees the [ManifestStore] and [ChangelogStore]
//! traits. [fs] holds the on-disk implementations, [memory] the in-memory
//! ones used by tests and dry runs.

pub mod fs;
pub mod memory;

pub use fs::{ChangelogFile, JsonManifest};
pub use memory::{MemoryChangelog, MemoryManifest};

use crate::error::Result;

/// Source and sink of the project's version string
pub trait ManifestStore {
    /// Read the current version. Fails with `ManifestUnreadable` when the
    /// manifest is missing, malformed, or has no version field.
    fn read_version(&self) -> Result<String>;

    /// Replace the version, keeping every other field and the key order
    fn write_version(&self, version: &str) -> Result<()>;

    /// Path shown to users and staged in the release commit
    fn location(&self) -> String;
}

/// Source and sink of the changelog document
pub trait ChangelogStore {
    /// Existing changelog text, `None` when there is none yet
    fn read(&self) -> Result<Option<String>>;

    /// Replace the whole changelog text
    fn write(&self, text: &str) -> Result<()>;

    /// Path shown to users and staged in the release commit
    fn location(&self) -> String;
}
