use std::fmt;
use thiserror::Error;

use crate::model::ids::{QuestionId, QuizId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz must contain at least one question")]
    NoQuestions,

    #[error("quiz duration must be > 0 minutes")]
    ZeroDuration,

    #[error("duplicate question id: {0}")]
    DuplicateQuestion(QuestionId),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// How a question expects to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Pick exactly one of the offered options.
    MultipleChoice,
    /// True or false.
    TrueFalse,
    /// Free-form text.
    ShortAnswer,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::MultipleChoice => write!(f, "multiple choice"),
            QuestionKind::TrueFalse => write!(f, "true/false"),
            QuestionKind::ShortAnswer => write!(f, "short answer"),
        }
    }
}

/// A single quiz question. Read-only for the lifetime of an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    kind: QuestionKind,
    options: Vec<String>,
    points: u32,
}

impl Question {
    /// Creates a question.
    ///
    /// `options` is only meaningful for [`QuestionKind::MultipleChoice`];
    /// other kinds carry an empty list.
    #[must_use]
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        kind: QuestionKind,
        options: Vec<String>,
        points: u32,
    ) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            kind,
            options,
            points,
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A quiz as served by the assessment API.
///
/// Immutable once constructed; an attempt never mutates the quiz it runs over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    course_name: String,
    duration_minutes: u32,
    total_points: u32,
    questions: Vec<Question>,
}

impl Quiz {
    /// Creates a quiz from its metadata and ordered question list.
    ///
    /// Title and course text are taken as-is; the backend owns them and an
    /// odd-looking payload still loads. Question ids must be unique, since
    /// answer entries are keyed by id.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` if the question list is empty,
    /// `QuizError::ZeroDuration` if the duration is zero, and
    /// `QuizError::DuplicateQuestion` if two questions share an id.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        course_name: impl Into<String>,
        duration_minutes: u32,
        total_points: u32,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        if duration_minutes == 0 {
            return Err(QuizError::ZeroDuration);
        }
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        for (i, question) in questions.iter().enumerate() {
            if questions[..i].iter().any(|q| q.id() == question.id()) {
                return Err(QuizError::DuplicateQuestion(question.id()));
            }
        }

        Ok(Self {
            id,
            title: title.into(),
            course_name: course_name.into(),
            duration_minutes,
            total_points,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn course_name(&self) -> &str {
        &self.course_name
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Allotted time for one attempt, in whole seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> u32 {
        self.duration_minutes * 60
    }

    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.total_points
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Question at `index`, if within bounds.
    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
