//! Content model for lessons and practices
//!
//! Lessons come straight from the lesson manifest. Practices are built from
//! the raw per-lesson practice file: the declared correct-option id of each
//! question is resolved into a zero-based option index at load time, so the
//! scoring path never has to look at option ids again.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::models::{AnswerOption, PracticeFile, RawPractice, RawQuestion};

/// A single video lesson from the manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    /// Lesson id; doubles as the course id for progress rows
    pub id: i64,
    /// Display name
    pub name: String,
    /// Video location
    pub url: String,
    /// Video duration in seconds
    #[serde(default)]
    pub duration: f64,
    /// Display tags in order
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Lesson {
    /// Whole minutes of video, for display
    pub fn duration_minutes(&self) -> u64 {
        (self.duration / 60.0).floor().max(0.0) as u64
    }
}

/// A practice set attached to one lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Practice {
    /// Practice identifier, derived from the lesson id
    pub id: String,
    /// Display title (taken from the first paragraph)
    pub title: String,
    /// Reading paragraphs in order
    pub paragraphs: Vec<Paragraph>,
}

impl Practice {
    /// Build a practice from the raw manifest for a lesson
    pub fn from_file(lesson_id: i64, file: PracticeFile) -> Self {
        let title = file
            .practices
            .first()
            .map(|p| p.title.clone())
            .unwrap_or_else(|| "Practice".to_string());
        let paragraphs = file.practices.into_iter().map(Paragraph::from_raw).collect();

        Self { id: format!("practice-{}", lesson_id), title, paragraphs }
    }

    /// Find a paragraph by id
    pub fn paragraph(&self, paragraph_id: &str) -> Option<&Paragraph> {
        self.paragraphs.iter().find(|p| p.id == paragraph_id)
    }

    /// Whether every question in every paragraph has an answer recorded
    pub fn all_answered(&self, answers: &HashMap<String, usize>) -> bool {
        self.paragraphs.iter().all(|p| p.all_answered(answers))
    }
}

/// One reading paragraph: a passage plus its questions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    /// Paragraph identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Passage text (markdown, rendered by the view layer)
    pub passage: String,
    /// Multiple-choice questions in order
    pub questions: Vec<Question>,
}

impl Paragraph {
    fn from_raw(raw: RawPractice) -> Self {
        Self {
            id: raw.practice_id,
            title: raw.title,
            passage: raw.passage,
            questions: raw.questions.into_iter().map(Question::from_raw).collect(),
        }
    }

    /// Whether every question has an answer recorded
    pub fn all_answered(&self, answers: &HashMap<String, usize>) -> bool {
        self.questions.iter().all(|q| answers.contains_key(&q.id))
    }

    /// Score the recorded answers against this paragraph's questions
    ///
    /// Total always counts every question; an empty paragraph scores 0.
    pub fn score(&self, answers: &HashMap<String, usize>) -> SubmitOutcome {
        let total = self.questions.len() as u32;
        let correct = self
            .questions
            .iter()
            .filter(|q| answers.get(&q.id).is_some_and(|&choice| q.is_correct(choice)))
            .count() as u32;

        let rate = if total == 0 {
            0
        } else {
            ((f64::from(correct) / f64::from(total)) * 100.0).round() as u8
        };

        SubmitOutcome { correct, total, rate }
    }
}

/// One multiple-choice question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Question identifier
    pub id: String,
    /// Question text
    pub text: String,
    /// Answer options in display order
    pub options: Vec<AnswerOption>,
    /// Index of the correct option; None when the manifest's declared
    /// correct-option id matched nothing, in which case no answer scores
    pub correct_answer: Option<usize>,
}

impl Question {
    fn from_raw(raw: RawQuestion) -> Self {
        let correct_answer = raw.options.iter().position(|opt| opt.id == raw.correct_answer_id);
        Self { id: raw.id, text: raw.text, options: raw.options, correct_answer }
    }

    /// Whether the given option index is the correct one
    pub fn is_correct(&self, choice: usize) -> bool {
        self.correct_answer == Some(choice)
    }
}

/// Result of scoring one paragraph submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Questions answered correctly
    pub correct: u32,
    /// Questions in the paragraph
    pub total: u32,
    /// Percentage score, rounded
    pub rate: u8,
}

/// One practice-history entry, keyed by paragraph id in the store
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Percentage score at submission time
    pub rate: u8,
    /// Unix timestamp of the submission
    pub timestamp: i64,
}
