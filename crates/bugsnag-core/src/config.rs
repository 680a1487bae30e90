// SPDX-License-Identifier: Apache-2.0

//! Configuration management for the Bugsnag CLI.
//!
//! Provides layered configuration from a YAML file and environment variables.
//! Uses XDG-compliant paths.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `BUGSNAG_`)
//! 2. Config file: `$XDG_CONFIG_HOME/.bugsnag/.config.yml`
//!
//! # Examples
//!
//! ```bash
//! # Supply the API token without persisting it
//! BUGSNAG_API_TOKEN=abc bugsnag organization list
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BugsnagError;
use crate::types::{AuthType, OrganizationRef};

/// Config directory name inside the config home.
pub const DIR: &str = ".bugsnag";

/// Config file name, without extension.
pub const FILE_NAME: &str = ".config";

/// Config file extension.
pub const FILE_TYPE: &str = "yml";

/// Prefix of environment variables that override config fields.
pub const ENV_PREFIX: &str = "BUGSNAG";

/// Mode of a freshly created config directory.
#[cfg(unix)]
const DIR_MODE: u32 = 0o700;

/// Persisted configuration document.
///
/// The API token is never part of the document; it lives in the
/// environment, a netrc file or the system keyring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// API base URL without a trailing slash.
    pub api_endpoint: String,
    /// Login used for authentication.
    pub login: String,
    /// Default organization.
    pub organization: OrganizationRef,
}

/// Loaded view of the config store after environment overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// API base URL.
    pub api_endpoint: Option<String>,
    /// Login used for authentication.
    pub login: Option<String>,
    /// API token, only ever supplied through the environment or a hand-edited file.
    pub api_token: Option<String>,
    /// Authentication type.
    pub auth_type: Option<AuthType>,
    /// Default organization.
    pub organization: Option<OrganizationRef>,
    /// Debug output toggle.
    pub debug: bool,
}

impl Settings {
    /// Converts the settings into a document when all persisted fields are present.
    #[must_use]
    pub fn document(&self) -> Option<ConfigDocument> {
        Some(ConfigDocument {
            api_endpoint: non_empty(self.api_endpoint.as_deref())?.to_string(),
            login: non_empty(self.login.as_deref())?.to_string(),
            organization: self.organization.clone().unwrap_or_default(),
        })
    }
}

/// Returns `Some(s)` unless the value is absent or empty.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Returns the user-scope config home directory.
///
/// Respects the `XDG_CONFIG_HOME` environment variable if set,
/// otherwise defaults to `~/.config`.
pub fn config_home() -> Result<PathBuf, BugsnagError> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return Ok(PathBuf::from(xdg_config));
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .ok_or_else(|| BugsnagError::Config {
            message: "could not determine home directory - is HOME set?".to_string(),
        })
}

/// Returns the default path of the config file.
pub fn default_config_path() -> Result<PathBuf, BugsnagError> {
    Ok(config_home()?
        .join(DIR)
        .join(format!("{FILE_NAME}.{FILE_TYPE}")))
}

/// Reads and writes the config document at a fixed location.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a store at the default location under the config home.
    pub fn new() -> Result<Self, BugsnagError> {
        Ok(Self {
            path: default_config_path()?,
        })
    }

    /// Creates a store for an explicit file path (the `--config` flag).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Canonical path of the config file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the config file.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Path of the backup written before an existing file is replaced.
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".bkp");
        self.path.with_file_name(name)
    }

    /// Returns true if the config file exists and is not a directory.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists() && !self.path.is_dir()
    }

    /// Load settings from the config file (if present) and environment variables.
    ///
    /// Environment variables use the prefix `BUGSNAG_` and lowercased keys
    /// (e.g., `BUGSNAG_API_TOKEN` overrides `api_token`).
    ///
    /// # Errors
    ///
    /// Returns `BugsnagError::Config` if the config file exists but is invalid.
    pub fn read(&self) -> Result<Settings, BugsnagError> {
        let config = Config::builder()
            .add_source(
                File::from(self.path.as_path())
                    .format(FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX).ignore_empty(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        debug!(path = %self.path.display(), "Configuration loaded");
        Ok(settings)
    }

    /// Write the document, keeping the previous file as `<name>.bkp`.
    ///
    /// Creates the config directory with mode `0o700` if it does not exist.
    /// The write is not atomic; the backup is the only recovery path.
    pub fn write(&self, doc: &ConfigDocument) -> Result<PathBuf, BugsnagError> {
        let dir = self.dir();
        if !dir.exists() {
            create_dir(dir)?;
        }

        if self.exists() {
            let backup = self.backup_path();
            fs::rename(&self.path, &backup).map_err(|e| {
                BugsnagError::io(format!("Failed to back up {}", self.path.display()), e)
            })?;
            debug!(backup = %backup.display(), "Existing config backed up");
        }

        let contents =
            serde_saphyr::to_string(doc).map_err(|e| BugsnagError::Serialization {
                message: e.to_string(),
            })?;

        fs::write(&self.path, contents).map_err(|e| {
            BugsnagError::io(
                format!("Failed to write config file {}", self.path.display()),
                e,
            )
        })?;

        Ok(self.path.clone())
    }
}

#[cfg(unix)]
fn create_dir(dir: &Path) -> Result<(), BugsnagError> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(DIR_MODE)
        .create(dir)
        .map_err(|e| BugsnagError::io(format!("Failed to create directory {}", dir.display()), e))
}

#[cfg(not(unix))]
fn create_dir(dir: &Path) -> Result<(), BugsnagError> {
    fs::create_dir_all(dir)
        .map_err(|e| BugsnagError::io(format!("Failed to create directory {}", dir.display()), e))
}
