//! Session state machine
//!
//! Anonymous -> Verifying -> Authenticated, and back to Anonymous on logout
//! or detected expiry. The authenticated state is mirrored to disk so a
//! restart resumes the session without re-entering a code.

pub mod storage;

use crate::api::client::ApiClient;
use crate::api::error::ClientError;
use crate::api::models::User;
use crate::code;

pub use storage::CredentialStore;

/// Client-side session store
#[derive(Debug)]
pub struct SessionStore {
    /// Authenticated user, if any
    user: Option<User>,
    /// Bearer token, if any
    token: Option<String>,
    /// A verification request is in flight
    verifying: bool,
    /// Last verification error, for display
    error: Option<String>,
    /// Disk mirror
    credentials: CredentialStore,
}

impl SessionStore {
    /// Create a store, restoring any persisted session
    pub fn new(credentials: CredentialStore) -> Self {
        let user = credentials.user();
        let token = credentials.token();
        Self { user, token, verifying: false, error: None, credentials }
    }

    /// Token and user both present
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Authenticated user
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Bearer token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// A verification request is in flight
    pub fn is_verifying(&self) -> bool {
        self.verifying
    }

    /// Last verification error
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Verify an access code and establish an authenticated session
    ///
    /// Malformed codes fail fast without a network call. A rejected code
    /// returns `Ok(false)` and the store stays anonymous. Transport and
    /// backend errors record a display message and propagate; a previously
    /// established session is never invalidated by a failed attempt.
    pub async fn verify_code(
        &mut self,
        client: &ApiClient,
        code: &str,
    ) -> Result<bool, ClientError> {
        if !code::verify_format(code) {
            let err = ClientError::Format;
            self.error = Some(err.to_string());
            return Err(err);
        }

        self.verifying = true;
        self.error = None;

        match client.verify_code(code).await {
            Ok(response) if response.valid => {
                let user = response.user;
                let token = user.as_ref().and_then(|u| u.token.clone());

                self.user = user;
                self.token = token;
                self.verifying = false;
                self.credentials.store(self.token.as_deref(), self.user.as_ref());

                Ok(true)
            }
            Ok(_) => {
                self.verifying = false;
                Ok(false)
            }
            Err(err) => {
                self.verifying = false;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Clear the session and its disk mirror; no server round trip
    pub fn logout(&mut self) {
        self.credentials.clear();
        self.user = None;
        self.token = None;
        self.verifying = false;
        self.error = None;
    }

    /// Passive expiry check for a restored session
    ///
    /// Probes the verify endpoint with the stored token. Only an explicit
    /// invalid/expired-token answer clears the credentials; any other
    /// failure is ignored and the user simply falls through to re-entering
    /// a code.
    pub async fn check_stored_session(&mut self, client: &ApiClient) {
        let Some(token) = self.token.clone() else {
            return;
        };

        match client.probe_session(&token).await {
            Ok(()) => {}
            Err(err) if err.requires_reauth() => {
                tracing::info!("Stored session expired; clearing credentials");
                self.logout();
            }
            Err(err) => {
                tracing::debug!(error = %err, "Session probe failed; keeping credentials");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SessionStore {
        SessionStore::new(CredentialStore::new(dir.path().to_path_buf()))
    }

    #[test]
    fn fresh_store_is_anonymous() {
        let dir = TempDir::new().unwrap();
        let session = store_in(&dir);
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(session.token().is_none());
    }

    #[test]
    fn restores_persisted_session() {
        let dir = TempDir::new().unwrap();
        let credentials = CredentialStore::new(dir.path().to_path_buf());
        let user = User { id: 12, name: "Wei".into(), token: Some("abc123".into()) };
        credentials.store(Some("abc123"), Some(&user));

        let session = store_in(&dir);
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("abc123"));
        assert_eq!(session.user().unwrap().id, 12);
    }

    #[test]
    fn token_alone_is_not_authenticated() {
        let dir = TempDir::new().unwrap();
        let credentials = CredentialStore::new(dir.path().to_path_buf());
        credentials.store(Some("abc123"), None);

        let session = store_in(&dir);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn logout_clears_memory_and_mirror() {
        let dir = TempDir::new().unwrap();
        let credentials = CredentialStore::new(dir.path().to_path_buf());
        let user = User { id: 12, name: "Wei".into(), token: Some("abc123".into()) };
        credentials.store(Some("abc123"), Some(&user));

        let mut session = store_in(&dir);
        assert!(session.is_authenticated());

        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.error().is_none());

        // A fresh store sees nothing on disk either.
        let session = store_in(&dir);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn malformed_code_fails_before_any_network_call() {
        let dir = TempDir::new().unwrap();
        let mut session = store_in(&dir);

        // Unroutable endpoint: reaching the network would hang or error
        // differently; the format check must reject first.
        let client = ApiClient::new(crate::config::ApiConfig {
            verify_url: "http://192.0.2.1:1/api/verify-code".into(),
            progress_url: "http://192.0.2.1:1/api/course-progress".into(),
            content_url: "http://192.0.2.1:1".into(),
        });

        let result = session.verify_code(&client, "not-a-code").await;
        assert!(matches!(result, Err(ClientError::Format)));
        assert!(session.error().is_some());
        assert!(!session.is_verifying());
    }
}
