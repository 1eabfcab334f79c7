//! Configuration loading and management
//!
//! Handles parsing of the optional `pms.toml` file in the data directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;

/// Name of the configuration file inside the data directory
pub const CONFIG_FILE: &str = "pms.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backing file names, relative to the data directory
    #[serde(default)]
    pub files: FilesConfig,

    /// Storage behaviour
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Backing file names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    #[serde(default = "default_users_file")]
    pub users: String,

    #[serde(default = "default_projects_file")]
    pub projects: String,

    #[serde(default = "default_tasks_file")]
    pub tasks: String,
}

fn default_users_file() -> String {
    "users.json".to_string()
}

fn default_projects_file() -> String {
    "projects.json".to_string()
}

fn default_tasks_file() -> String {
    "tasks.json".to_string()
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            users: default_users_file(),
            projects: default_projects_file(),
            tasks: default_tasks_file(),
        }
    }
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// How long a rewrite waits for the advisory lock on a backing file
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a `pms.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = Self::path_in(data_dir);
        if config_path.exists() {
            match Self::load(&config_path) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Location of `pms.toml` for a data directory
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    fn validate(&self) -> Result<()> {
        self.files.validate()?;
        if self.storage.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "storage.lock_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl FilesConfig {
    fn validate(&self) -> Result<()> {
        let entries = [
            ("files.users", &self.users),
            ("files.projects", &self.projects),
            ("files.tasks", &self.tasks),
        ];

        for (field, name) in entries {
            if name.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("{field} cannot be empty")));
            }
        }

        if self.users == self.projects || self.users == self.tasks || self.projects == self.tasks
        {
            return Err(Error::InvalidConfig(
                "files.users, files.projects and files.tasks must be distinct".to_string(),
            ));
        }

        Ok(())
    }
}
