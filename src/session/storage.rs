//! Persisted session credentials
//!
//! Mirrors the two keys the web client keeps in local storage: the bearer
//! token and the serialized user. Storage may be missing or unwritable
//! (sandboxed installs, read-only home); every failure here degrades to a
//! no-op so a broken mirror can never take the session down with it.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::api::models::User;
use crate::config::Config;

/// File holding the bearer token
const TOKEN_FILE: &str = "token";
/// File holding the serialized user
const USER_FILE: &str = "user.json";

/// Disk mirror for session credentials
#[derive(Debug, Clone)]
pub struct CredentialStore {
    /// Directory the two credential files live in
    dir: PathBuf,
}

impl CredentialStore {
    /// Mirror rooted at an explicit directory
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Mirror rooted at the platform data directory
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Config::data_dir()?))
    }

    /// Read the stored token, if any
    pub fn token(&self) -> Option<String> {
        let token = fs::read_to_string(self.dir.join(TOKEN_FILE)).ok()?;
        if token.is_empty() { None } else { Some(token) }
    }

    /// Read the stored user, if any
    pub fn user(&self) -> Option<User> {
        let raw = fs::read_to_string(self.dir.join(USER_FILE)).ok()?;
        serde_json::from_str(&raw).ok()
    }

    /// Persist credentials; each part is written only when present
    pub fn store(&self, token: Option<&str>, user: Option<&User>) {
        if let Err(err) = fs::create_dir_all(&self.dir) {
            tracing::warn!(error = %err, "Failed to create credential directory");
            return;
        }

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            if let Err(err) = fs::write(self.dir.join(TOKEN_FILE), token) {
                tracing::warn!(error = %err, "Failed to persist token");
            }
        }

        if let Some(user) = user {
            match serde_json::to_string(user) {
                Ok(raw) => {
                    if let Err(err) = fs::write(self.dir.join(USER_FILE), raw) {
                        tracing::warn!(error = %err, "Failed to persist user");
                    }
                }
                Err(err) => tracing::warn!(error = %err, "Failed to serialize user"),
            }
        }
    }

    /// Remove both credential files
    pub fn clear(&self) {
        let _ = fs::remove_file(self.dir.join(TOKEN_FILE));
        let _ = fs::remove_file(self.dir.join(USER_FILE));
    }
}
