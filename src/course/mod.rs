//! Lesson and practice state
//!
//! The content model plus the client-side store that drives the lesson
//! browser, video page, and quiz flow.

pub mod model;
pub mod store;

// Re-export commonly used types
pub use model::{HistoryEntry, Lesson, Paragraph, Practice, Question, SubmitOutcome};
pub use store::CourseStore;
