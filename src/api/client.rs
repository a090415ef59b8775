//! HTTP client for the backend API and static content

use reqwest::{Client, StatusCode};

use super::error::ClientError;
use super::models::{
    ErrorBody, PracticeFile, ProgressAck, ProgressListing, ProgressRow, ProgressUpdate,
    VerifyRequest, VerifyResponse,
};
use crate::config::ApiConfig;
use crate::course::model::Lesson;

/// Typed client over the verify, content, and progress endpoints
pub struct ApiClient {
    /// HTTP client
    client: Client,
    /// Endpoint configuration
    config: ApiConfig,
}

impl ApiClient {
    /// Request timeout in seconds
    const TIMEOUT_SECS: u64 = 30;
    /// Backend message that marks a dead session (compared case-insensitively)
    const EXPIRED_TOKEN_MESSAGE: &'static str = "invalid or expired token";

    /// Create a new client for the given endpoints
    pub fn new(config: ApiConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(Self::TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Submit an access code for verification
    ///
    /// A rejected code still comes back as a 2xx response with `valid:false`;
    /// only transport-level failures and non-2xx statuses become errors.
    pub async fn verify_code(&self, code: &str) -> Result<VerifyResponse, ClientError> {
        let response = self
            .client
            .post(&self.config.verify_url)
            .json(&VerifyRequest { code })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response).await;
            return Err(Self::classify(status, message));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Zero-payload authenticated probe against the verify endpoint
    ///
    /// Used at startup to detect expired tokens; returns
    /// [`ClientError::AuthExpired`] exactly when the backend says so.
    pub async fn probe_session(&self, token: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .post(&self.config.verify_url)
            .bearer_auth(token)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = Self::error_message(response).await;
        Err(Self::classify(status, message))
    }

    /// Fetch the lesson manifest (`courses.json`)
    pub async fn fetch_lessons(&self) -> Result<Vec<Lesson>, ClientError> {
        let url = self.content_url("courses.json");
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound { what: "Lesson manifest".to_string() });
        }
        if !status.is_success() {
            let message = Self::error_message(response).await;
            return Err(Self::classify(status, message));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch the raw practice manifest for a lesson
    pub async fn fetch_practice_file(&self, lesson_id: i64) -> Result<PracticeFile, ClientError> {
        let url = self.content_url(&format!("practice/{}.json", lesson_id));
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                what: format!("Practice file for lesson {}", lesson_id),
            });
        }
        if !status.is_success() {
            let message = Self::error_message(response).await;
            return Err(Self::classify(status, message));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Upsert one progress row for the authenticated user
    pub async fn push_progress(
        &self,
        token: Option<&str>,
        update: &ProgressUpdate,
    ) -> Result<ProgressAck, ClientError> {
        let mut request = self.client.post(&self.config.progress_url).json(update);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response).await;
            return Err(Self::classify(status, message));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch all progress rows for the authenticated user
    pub async fn fetch_progress(&self, token: Option<&str>) -> Result<Vec<ProgressRow>, ClientError> {
        let mut request = self.client.get(&self.config.progress_url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response).await;
            return Err(Self::classify(status, message));
        }

        let body = response.text().await?;
        let listing: ProgressListing = serde_json::from_str(&body)?;
        if !listing.success {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: listing
                    .message
                    .unwrap_or_else(|| "Failed to fetch course progress".to_string()),
            });
        }

        Ok(listing.items)
    }

    /// Join a path onto the content base URL
    fn content_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.content_url.trim_end_matches('/'), path)
    }

    /// Pull the backend's error message out of a failed response
    async fn error_message(response: reqwest::Response) -> String {
        let text = response.text().await.unwrap_or_default();
        serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or(text)
    }

    /// Map a failed response to the error taxonomy
    ///
    /// A 401, or any body message that names an invalid/expired token, means
    /// the session is dead; everything else is a plain API error.
    fn classify(status: StatusCode, message: String) -> ClientError {
        if status == StatusCode::UNAUTHORIZED
            || message.to_lowercase().contains(Self::EXPIRED_TOKEN_MESSAGE)
        {
            return ClientError::AuthExpired { message };
        }

        let message = if message.is_empty() { format!("HTTP {}", status.as_u16()) } else { message };
        ClientError::Api { status: status.as_u16(), message }
    }
}
