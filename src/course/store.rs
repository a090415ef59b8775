//! Lesson and practice state store
//!
//! Owns the fetched lesson list, the practice currently being worked, the
//! user's answers, submission history, and the per-course progress cache.
//! Fetched results are applied as whole-value snapshot replacements; the
//! practice fetch is additionally guarded by a sequence ticket so a
//! superseded response can never clobber fresher state.

use std::collections::HashMap;
use std::time::SystemTime;

use crate::api::client::ApiClient;
use crate::api::error::ClientError;
use crate::api::models::{PracticeFile, ProgressRow};

use super::model::{HistoryEntry, Lesson, Practice, SubmitOutcome};

/// Client-side store for lessons, practices, answers, and progress
#[derive(Debug, Default)]
pub struct CourseStore {
    /// Fetched lesson manifest
    lessons: Vec<Lesson>,
    /// Currently selected lesson
    current_lesson: Option<Lesson>,
    /// Currently loaded practice
    current_practice: Option<Practice>,
    /// Recorded answers, question id -> option index
    user_answers: HashMap<String, usize>,
    /// Submission history, paragraph id -> latest outcome
    practice_history: HashMap<String, HistoryEntry>,
    /// Progress cache, course id (as string) -> server row
    course_progress: HashMap<String, ProgressRow>,
    /// Whether the current submission is locked pending an explicit re-answer
    submitted: bool,
    /// A fetch is in flight
    loading: bool,
    /// Last fetch error, for display
    error: Option<String>,
    /// Ticket of the latest practice fetch; older completions are discarded
    practice_fetch_seq: u64,
}

impl CourseStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the lesson manifest
    ///
    /// On failure the previous lesson list is left untouched.
    pub async fn fetch_lessons(&mut self, client: &ApiClient) -> Result<&[Lesson], ClientError> {
        self.loading = true;
        self.error = None;

        match client.fetch_lessons().await {
            Ok(lessons) => {
                self.lessons = lessons;
                self.loading = false;
                Ok(&self.lessons)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.loading = false;
                Err(err)
            }
        }
    }

    /// Select a lesson from the fetched list by id
    ///
    /// An unknown id leaves no lesson selected.
    pub fn set_current_lesson(&mut self, lesson_id: i64) {
        self.current_lesson = self.lessons.iter().find(|l| l.id == lesson_id).cloned();
    }

    /// Fetch and load the practice for a lesson
    pub async fn fetch_practice(
        &mut self,
        client: &ApiClient,
        lesson_id: i64,
    ) -> Result<(), ClientError> {
        let ticket = self.begin_practice_fetch();
        let result = client.fetch_practice_file(lesson_id).await;
        self.apply_practice_result(ticket, lesson_id, result).map(|_| ())
    }

    /// Start a practice fetch and hand out its ticket
    pub fn begin_practice_fetch(&mut self) -> u64 {
        self.practice_fetch_seq += 1;
        self.loading = true;
        self.error = None;
        self.practice_fetch_seq
    }

    /// Apply a completed practice fetch
    ///
    /// A ticket that is no longer the latest means the fetch was superseded;
    /// the response is dropped and state is left exactly as-is. Otherwise the
    /// practice is replaced (or cleared, on failure) and the recorded answers
    /// reset either way.
    pub fn apply_practice_result(
        &mut self,
        ticket: u64,
        lesson_id: i64,
        result: Result<PracticeFile, ClientError>,
    ) -> Result<Option<&Practice>, ClientError> {
        if ticket != self.practice_fetch_seq {
            tracing::debug!(lesson_id, ticket, "Discarding stale practice response");
            return Ok(None);
        }

        self.loading = false;
        self.user_answers.clear();
        self.submitted = false;

        match result {
            Ok(file) => {
                self.current_practice = Some(Practice::from_file(lesson_id, file));
                self.error = None;
                Ok(self.current_practice.as_ref())
            }
            Err(err) => {
                self.current_practice = None;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Record or overwrite the user's answer for a question
    ///
    /// No validation that the question belongs to the current paragraph.
    pub fn set_user_answer(&mut self, question_id: &str, option_index: usize) {
        self.user_answers.insert(question_id.to_string(), option_index);
    }

    /// Clear recorded answers and unlock submission (the re-answer action)
    pub fn reset_answers(&mut self) {
        self.user_answers.clear();
        self.submitted = false;
    }

    /// Score a paragraph of the current practice and record the outcome
    ///
    /// Re-submission overwrites the history entry. Returns None when no
    /// practice is loaded or the paragraph id is unknown.
    pub fn submit_practice(&mut self, paragraph_id: &str) -> Option<SubmitOutcome> {
        let practice = self.current_practice.as_ref()?;
        let paragraph = practice.paragraph(paragraph_id)?;

        let outcome = paragraph.score(&self.user_answers);
        self.practice_history.insert(
            paragraph_id.to_string(),
            HistoryEntry { rate: outcome.rate, timestamp: unix_now() },
        );
        self.submitted = true;

        Some(outcome)
    }

    /// Rebuild the progress cache from the backend
    ///
    /// Non-fatal: failures are logged and the existing cache survives.
    pub async fn fetch_course_progress(&mut self, client: &ApiClient, token: Option<&str>) {
        match client.fetch_progress(token).await {
            Ok(items) => self.apply_progress_rows(items),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to fetch course progress");
            }
        }
    }

    /// Replace the progress cache with freshly fetched rows
    pub fn apply_progress_rows(&mut self, items: Vec<ProgressRow>) {
        let mut cache = HashMap::with_capacity(items.len());
        for item in items {
            cache.insert(item.course_id.to_string(), item);
        }
        self.course_progress = cache;
    }

    /// All fetched lessons
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    /// Currently selected lesson
    pub fn current_lesson(&self) -> Option<&Lesson> {
        self.current_lesson.as_ref()
    }

    /// Currently loaded practice
    pub fn current_practice(&self) -> Option<&Practice> {
        self.current_practice.as_ref()
    }

    /// Recorded answers
    pub fn user_answers(&self) -> &HashMap<String, usize> {
        &self.user_answers
    }

    /// Submission history keyed by paragraph id
    pub fn practice_history(&self) -> &HashMap<String, HistoryEntry> {
        &self.practice_history
    }

    /// Cached progress row for a course, if any
    pub fn progress_for(&self, course_id: i64) -> Option<&ProgressRow> {
        self.course_progress.get(&course_id.to_string())
    }

    /// Whether the latest submission is still locked
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Whether a fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last recorded fetch error
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Current unix timestamp in seconds
fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{AnswerOption, RawPractice, RawQuestion};

    fn practice_file() -> PracticeFile {
        PracticeFile {
            practices: vec![RawPractice {
                practice_id: "p1".into(),
                title: "Reading One".into(),
                passage: "Passage.".into(),
                questions: vec![
                    RawQuestion {
                        id: "q1".into(),
                        text: "First?".into(),
                        options: vec![
                            AnswerOption { id: "a".into(), text: "A".into() },
                            AnswerOption { id: "b".into(), text: "B".into() },
                        ],
                        correct_answer_id: "a".into(),
                    },
                    RawQuestion {
                        id: "q2".into(),
                        text: "Second?".into(),
                        options: vec![
                            AnswerOption { id: "a".into(), text: "A".into() },
                            AnswerOption { id: "b".into(), text: "B".into() },
                        ],
                        correct_answer_id: "b".into(),
                    },
                ],
            }],
        }
    }

    fn lesson(id: i64, name: &str) -> Lesson {
        Lesson { id, name: name.into(), url: format!("/videos/{}.mp4", id), duration: 600.0, tags: vec![] }
    }

    fn loaded_store() -> CourseStore {
        let mut store = CourseStore::new();
        let ticket = store.begin_practice_fetch();
        store.apply_practice_result(ticket, 3, Ok(practice_file())).unwrap();
        store
    }

    #[test]
    fn set_current_lesson_selects_by_id() {
        let mut store = CourseStore::new();
        store.lessons = vec![lesson(1, "Intro"), lesson(2, "Advanced")];

        store.set_current_lesson(2);
        assert_eq!(store.current_lesson().unwrap().name, "Advanced");

        store.set_current_lesson(99);
        assert!(store.current_lesson().is_none());
    }

    #[test]
    fn practice_load_resets_answers() {
        let mut store = loaded_store();
        store.set_user_answer("q1", 0);
        assert_eq!(store.user_answers().len(), 1);

        let ticket = store.begin_practice_fetch();
        store.apply_practice_result(ticket, 3, Ok(practice_file())).unwrap();
        assert!(store.user_answers().is_empty());
    }

    #[test]
    fn failed_practice_load_clears_practice_and_records_error() {
        let mut store = loaded_store();
        store.set_user_answer("q1", 0);

        let ticket = store.begin_practice_fetch();
        let result = store.apply_practice_result(
            ticket,
            3,
            Err(ClientError::NotFound { what: "Practice file for lesson 3".into() }),
        );

        assert!(result.is_err());
        assert!(store.current_practice().is_none());
        assert!(store.user_answers().is_empty());
        assert!(store.error().unwrap().contains("not found"));
        assert!(!store.is_loading());
    }

    #[test]
    fn stale_practice_response_is_discarded() {
        let mut store = loaded_store();
        store.set_user_answer("q1", 0);

        let stale = store.begin_practice_fetch();
        let fresh = store.begin_practice_fetch();

        // The superseded completion must not touch any state.
        let applied = store.apply_practice_result(stale, 3, Ok(PracticeFile { practices: vec![] }));
        assert!(matches!(applied, Ok(None)));
        assert!(store.current_practice().is_some());
        assert_eq!(store.user_answers().len(), 1);
        assert!(store.is_loading());

        // The latest completion applies normally.
        let applied = store.apply_practice_result(fresh, 3, Ok(practice_file())).unwrap();
        assert!(applied.is_some());
        assert!(!store.is_loading());
    }

    #[test]
    fn submit_practice_scores_and_records_history() {
        let mut store = loaded_store();
        store.set_user_answer("q1", 0); // correct
        store.set_user_answer("q2", 0); // wrong

        let outcome = store.submit_practice("p1").unwrap();
        assert_eq!(outcome.correct, 1);
        assert_eq!(outcome.total, 2);
        assert_eq!(outcome.rate, 50);
        assert!(store.is_submitted());

        let entry = store.practice_history().get("p1").unwrap();
        assert_eq!(entry.rate, 50);
    }

    #[test]
    fn resubmission_overwrites_history() {
        let mut store = loaded_store();
        store.set_user_answer("q1", 1); // wrong
        store.set_user_answer("q2", 0); // wrong
        store.submit_practice("p1").unwrap();
        assert_eq!(store.practice_history()["p1"].rate, 0);

        store.reset_answers();
        assert!(!store.is_submitted());
        store.set_user_answer("q1", 0);
        store.set_user_answer("q2", 1);
        store.submit_practice("p1").unwrap();
        assert_eq!(store.practice_history()["p1"].rate, 100);
        assert_eq!(store.practice_history().len(), 1);
    }

    #[test]
    fn submit_unknown_paragraph_is_a_no_op() {
        let mut store = loaded_store();
        assert!(store.submit_practice("p9").is_none());
        assert!(store.practice_history().is_empty());

        let mut empty = CourseStore::new();
        assert!(empty.submit_practice("p1").is_none());
    }

    #[test]
    fn progress_cache_is_keyed_by_course_id_string() {
        let mut store = CourseStore::new();
        store.apply_progress_rows(vec![
            ProgressRow { course_id: 1, progress_percent: Some(40), ..Default::default() },
            ProgressRow { course_id: 2, total_answered: Some(4), total_correct: Some(3), ..Default::default() },
        ]);

        assert_eq!(store.progress_for(1).unwrap().progress_percent, Some(40));
        assert_eq!(store.progress_for(2).unwrap().total_correct, Some(3));
        assert!(store.progress_for(9).is_none());

        // A refetch replaces the whole cache.
        store.apply_progress_rows(vec![ProgressRow { course_id: 2, ..Default::default() }]);
        assert!(store.progress_for(1).is_none());
    }

    #[test]
    fn answers_overwrite_previous_choice() {
        let mut store = loaded_store();
        store.set_user_answer("q1", 0);
        store.set_user_answer("q1", 1);
        assert_eq!(store.user_answers()["q1"], 1);
    }
}
