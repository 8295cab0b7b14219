use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::tag::DEFAULT_EXCERPT_LEN;
use crate::error::{ReleaseError, Result};

/// File name looked up in the current directory
pub const PROJECT_CONFIG: &str = "gitrelease.toml";

/// File name looked up in the user configuration directory
pub const USER_CONFIG: &str = ".gitrelease.toml";

/// Represents the complete configuration for git-release.
///
/// Every field has a default so an empty or partial file is valid.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Branches releases may be cut from
    pub main_branches: Vec<String>,

    /// Remote the release tag is pushed to
    pub remote: String,

    /// JSON manifest holding the project version
    pub manifest_path: PathBuf,

    /// Markdown changelog the release section is prepended to
    pub changelog_path: PathBuf,

    /// Base URL for changelog reference links, derived from the remote when unset
    pub repository_url: Option<String>,

    /// Number of changelog characters copied into the tag annotation
    pub tag_message_excerpt: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            main_branches: vec!["main".to_string(), "master".to_string()],
            remote: "origin".to_string(),
            manifest_path: PathBuf::from("package.json"),
            changelog_path: PathBuf::from("CHANGELOG.md"),
            repository_url: None,
            tag_message_excerpt: DEFAULT_EXCERPT_LEN,
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in current directory
/// 3. `.gitrelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed, or an explicit path is missing
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(),
    };

    let Some(path) = path else {
        debug!("no configuration file found, using defaults");
        return Ok(Config::default());
    };

    let text = fs::read_to_string(&path)
        .map_err(|e| ReleaseError::config(format!("cannot read {}: {}", path.display(), e)))?;
    let config = parse_config(&text)
        .map_err(|e| ReleaseError::config(format!("{}: {}", path.display(), e)))?;

    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Parse configuration text
pub fn parse_config(text: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(text)
}

fn discover_config() -> Option<PathBuf> {
    let local = PathBuf::from(PROJECT_CONFIG);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG))
        .filter(|path| path.exists())
}
