//! Backend API integration module
//!
//! Provides the typed HTTP client, wire-format models, and error taxonomy
//! for the code-verification, content-manifest, and progress endpoints.

pub mod client;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use client::ApiClient;
pub use error::ClientError;
pub use models::{ProgressRow, ProgressUpdate, User, VerifyResponse};
