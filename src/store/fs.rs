use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use super::{ChangelogStore, ManifestStore};
use crate::error::{ReleaseError, Result};

/// A JSON package manifest carrying a top-level `"version"` string
#[derive(Debug, Clone)]
pub struct JsonManifest {
    path: PathBuf,
}

impl JsonManifest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonManifest { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<serde_json::Map<String, Value>> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            ReleaseError::manifest(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(ReleaseError::manifest(format!(
                "{} is not a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(ReleaseError::manifest(format!(
                "cannot parse {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

impl ManifestStore for JsonManifest {
    fn read_version(&self) -> Result<String> {
        let map = self.load()?;
        match map.get("version") {
            Some(Value::String(version)) => Ok(version.clone()),
            Some(_) => Err(ReleaseError::manifest(format!(
                "\"version\" in {} is not a string",
                self.path.display()
            ))),
            None => Err(ReleaseError::manifest(format!(
                "{} has no \"version\" field",
                self.path.display()
            ))),
        }
    }

    fn write_version(&self, version: &str) -> Result<()> {
        let mut map = self.load()?;
        // Existing keys keep their position; a missing one is appended.
        map.insert("version".to_string(), Value::String(version.to_string()));

        let mut text = serde_json::to_string_pretty(&Value::Object(map))?;
        text.push('\n');
        fs::write(&self.path, text)?;

        debug!(path = %self.path.display(), version, "manifest version written");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// A markdown changelog on disk
#[derive(Debug, Clone)]
pub struct ChangelogFile {
    path: PathBuf,
}

impl ChangelogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ChangelogFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChangelogStore for ChangelogFile {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, text: &str) -> Result<()> {
        fs::write(&self.path, text)?;
        debug!(path = %self.path.display(), bytes = text.len(), "changelog written");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
