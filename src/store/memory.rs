use std::sync::Mutex;

use super::{ChangelogStore, ManifestStore};
use crate::error::{ReleaseError, Result};

/// In-memory manifest holding only a version string
#[derive(Debug, Default)]
pub struct MemoryManifest {
    version: Mutex<Option<String>>,
}

impl MemoryManifest {
    pub fn new(version: impl Into<String>) -> Self {
        MemoryManifest {
            version: Mutex::new(Some(version.into())),
        }
    }

    /// A manifest without a version field
    pub fn empty() -> Self {
        MemoryManifest::default()
    }

    pub fn version(&self) -> Option<String> {
        self.version.lock().ok().and_then(|v| v.clone())
    }
}

impl ManifestStore for MemoryManifest {
    fn read_version(&self) -> Result<String> {
        self.version()
            .ok_or_else(|| ReleaseError::manifest("manifest has no \"version\" field"))
    }

    fn write_version(&self, version: &str) -> Result<()> {
        let mut slot = self
            .version
            .lock()
            .map_err(|_| ReleaseError::manifest("manifest lock poisoned"))?;
        *slot = Some(version.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "package.json".to_string()
    }
}

/// In-memory changelog
#[derive(Debug, Default)]
pub struct MemoryChangelog {
    text: Mutex<Option<String>>,
}

impl MemoryChangelog {
    pub fn new(text: impl Into<String>) -> Self {
        MemoryChangelog {
            text: Mutex::new(Some(text.into())),
        }
    }

    pub fn text(&self) -> Option<String> {
        self.text.lock().ok().and_then(|t| t.clone())
    }
}

impl ChangelogStore for MemoryChangelog {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.text())
    }

    fn write(&self, text: &str) -> Result<()> {
        let mut slot = self
            .text
            .lock()
            .map_err(|_| ReleaseError::config("changelog lock poisoned"))?;
        *slot = Some(text.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "CHANGELOG.md".to_string()
    }
}
