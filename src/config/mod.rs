//! Configuration management for the client engine

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Salt mixed into the access-code checksum when none is configured
pub const DEFAULT_CODE_SALT: &str = "default-salt-key";

/// Remote endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Code-verification endpoint (POST)
    pub verify_url: String,
    /// Course-progress endpoint (GET/POST)
    pub progress_url: String,
    /// Base URL for static content (lesson and practice manifests, videos)
    pub content_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            verify_url: "http://127.0.0.1:8000/api/verify-code".to_string(),
            progress_url: "http://127.0.0.1:8000/api/course-progress".to_string(),
            content_url: "http://127.0.0.1:5173".to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Checksum salt shared with the code-distribution tooling
    pub code_salt: String,

    /// Remote endpoints
    pub api: ApiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self { code_salt: DEFAULT_CODE_SALT.to_string(), api: ApiConfig::default() }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "exammaster")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the data directory path (persisted session credentials)
    pub fn data_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "exammaster")
            .context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }
}
