//! Wire-format models for backend requests and responses

use serde::{Deserialize, Serialize};

/// Authenticated user as returned by the verify endpoint
///
/// The fresh bearer token rides inside the user object on a successful
/// verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Numeric user id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Bearer token issued for this session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Request body for code verification
///
/// The expiry probe sends an empty body instead (no `code` field) together
/// with the stored bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyRequest<'a> {
    /// Access code entered by the user
    pub code: &'a str,
}

/// Response from the code-verification endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    /// Whether the code was accepted
    pub valid: bool,
    /// User info, present when `valid` is true
    #[serde(default)]
    pub user: Option<User>,
    /// Human-readable rejection or error message
    #[serde(default)]
    pub message: Option<String>,
}

/// One server-persisted progress row for a (user, course) pair
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressRow {
    /// Course (lesson) id
    pub course_id: i64,
    /// Watch progress, 0-100
    #[serde(default)]
    pub progress_percent: Option<u8>,
    /// Quiz questions answered
    #[serde(default)]
    pub total_answered: Option<u32>,
    /// Quiz questions answered correctly
    #[serde(default)]
    pub total_correct: Option<u32>,
}

/// Body for the progress upsert endpoint
///
/// The user id is resolved server-side from the bearer token; only the
/// fields being reported are serialized.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressUpdate {
    /// Course (lesson) id
    pub course_id: i64,
    /// Watch progress, clamped to 0-100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<u8>,
    /// Quiz questions answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_answered: Option<u32>,
    /// Quiz questions answered correctly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_correct: Option<u32>,
}

impl ProgressUpdate {
    /// Build a watch-progress report
    pub fn watch(course_id: i64, percent: u8) -> Self {
        Self {
            course_id,
            progress_percent: Some(percent.min(100)),
            total_answered: None,
            total_correct: None,
        }
    }

    /// Build a quiz-score report
    pub fn quiz(course_id: i64, total_answered: u32, total_correct: u32) -> Self {
        Self {
            course_id,
            progress_percent: None,
            total_answered: Some(total_answered),
            total_correct: Some(total_correct),
        }
    }
}

/// Acknowledgement from the progress upsert endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressAck {
    /// Whether the row was persisted
    pub success: bool,
    /// Error detail when `success` is false
    #[serde(default)]
    pub message: Option<String>,
}

/// Response from the progress listing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressListing {
    /// Whether the query succeeded
    pub success: bool,
    /// All rows for the authenticated user
    #[serde(default)]
    pub items: Vec<ProgressRow>,
    /// Error detail when `success` is false
    #[serde(default)]
    pub message: Option<String>,
}

/// Raw per-lesson practice manifest (`practice/<lessonId>.json`)
#[derive(Debug, Clone, Deserialize)]
pub struct PracticeFile {
    /// Practice units, one per reading paragraph
    pub practices: Vec<RawPractice>,
}

/// One raw practice unit: a passage plus its questions
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPractice {
    /// Paragraph identifier
    pub practice_id: String,
    /// Paragraph title
    pub title: String,
    /// Passage text (markdown, rendered by the view layer)
    #[serde(default)]
    pub passage: String,
    /// Multiple-choice questions over the passage
    pub questions: Vec<RawQuestion>,
}

/// One raw multiple-choice question
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestion {
    /// Question identifier
    pub id: String,
    /// Question text
    pub text: String,
    /// Answer options in display order
    pub options: Vec<AnswerOption>,
    /// Id of the correct option; resolved to an index at load time
    pub correct_answer_id: String,
}

/// One answer option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Option identifier
    pub id: String,
    /// Option text
    pub text: String,
}

/// Minimal error body (`{ "message": ... }`) sent by the backend on failures
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
