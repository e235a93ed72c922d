use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use edunex_core::model::{AnswerSheet, QuestionId, Quiz, QuizError, QuizId, UserId};

/// Errors surfaced by assessment API clients.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("quiz not found")]
    NotFound,

    #[error("not authorized")]
    Unauthorized,

    #[error("unexpected status: {0}")]
    UnexpectedStatus(reqwest::StatusCode),

    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error("invalid quiz payload: {0}")]
    InvalidQuiz(#[from] QuizError),
}

/// Listing entry for a student's available quizzes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOverview {
    pub id: QuizId,
    pub title: String,
    pub course_name: String,
    pub duration_minutes: u32,
    pub total_points: u32,
}

/// Client contract for the external assessment service.
///
/// The service owns the request/response shapes; this trait exposes only the
/// operations the attempt flow needs.
#[async_trait]
pub trait AssessmentApi: Send + Sync {
    /// Fetch a quiz with its full question list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id,
    /// `ApiError::Unauthorized` when the credential is missing or expired,
    /// and `ApiError::Network` for transport failures.
    async fn fetch_quiz(&self, quiz_id: QuizId) -> Result<Quiz, ApiError>;

    /// Submit the full answer set for one attempt.
    ///
    /// Every entry is sent, including empty strings for unanswered questions.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the service rejects the submission or the
    /// transport fails.
    async fn submit_attempt(
        &self,
        quiz_id: QuizId,
        answers: &AnswerSheet,
    ) -> Result<(), ApiError>;

    /// List the quizzes currently available to a student.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for authorization or transport failures.
    async fn student_quizzes(&self, student_id: UserId) -> Result<Vec<QuizOverview>, ApiError>;
}

/// Recorded submission, kept by the in-memory client for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
    pub quiz_id: QuizId,
    pub answers: Vec<(QuestionId, String)>,
}

/// Simple in-memory assessment API for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryAssessmentApi {
    quizzes: Arc<Mutex<HashMap<QuizId, Quiz>>>,
    submissions: Arc<Mutex<Vec<RecordedSubmission>>>,
}

// Lock poisoning carries no meaning for these plain collections; recover
// the inner value instead of propagating the panic.
fn relock<T>(lock: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl InMemoryAssessmentApi {
    #[must_use]
    pub fn new() -> Self {
        Self {
            quizzes: Arc::new(Mutex::new(HashMap::new())),
            submissions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Registers a quiz so `fetch_quiz` can serve it.
    pub fn insert_quiz(&self, quiz: Quiz) {
        relock(&self.quizzes).insert(quiz.id(), quiz);
    }

    /// Submissions recorded so far, in arrival order.
    #[must_use]
    pub fn submissions(&self) -> Vec<RecordedSubmission> {
        relock(&self.submissions).clone()
    }
}

#[async_trait]
impl AssessmentApi for InMemoryAssessmentApi {
    async fn fetch_quiz(&self, quiz_id: QuizId) -> Result<Quiz, ApiError> {
        relock(&self.quizzes)
            .get(&quiz_id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn submit_attempt(
        &self,
        quiz_id: QuizId,
        answers: &AnswerSheet,
    ) -> Result<(), ApiError> {
        if !relock(&self.quizzes).contains_key(&quiz_id) {
            return Err(ApiError::NotFound);
        }
        let recorded = RecordedSubmission {
            quiz_id,
            answers: answers
                .entries()
                .iter()
                .map(|e| (e.question_id(), e.answer().to_owned()))
                .collect(),
        };
        relock(&self.submissions).push(recorded);
        Ok(())
    }

    async fn student_quizzes(&self, _student_id: UserId) -> Result<Vec<QuizOverview>, ApiError> {
        let mut listing: Vec<QuizOverview> = relock(&self.quizzes)
            .values()
            .map(|quiz| QuizOverview {
                id: quiz.id(),
                title: quiz.title().to_owned(),
                course_name: quiz.course_name().to_owned(),
                duration_minutes: quiz.duration_minutes(),
                total_points: quiz.total_points(),
            })
            .collect();
        listing.sort_by_key(|overview| overview.id);
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edunex_core::model::{Question, QuestionKind};

    fn build_quiz(id: u64) -> Quiz {
        let questions = vec![
            Question::new(
                QuestionId::new(1),
                "Q1",
                QuestionKind::ShortAnswer,
                Vec::new(),
                1,
            ),
            Question::new(
                QuestionId::new(2),
                "Q2",
                QuestionKind::TrueFalse,
                Vec::new(),
                1,
            ),
        ];
        Quiz::new(QuizId::new(id), format!("Quiz {id}"), "Course", 30, 2, questions).unwrap()
    }

    #[tokio::test]
    async fn fetches_registered_quiz() {
        let api = InMemoryAssessmentApi::new();
        api.insert_quiz(build_quiz(1));

        let quiz = api.fetch_quiz(QuizId::new(1)).await.unwrap();
        assert_eq!(quiz.question_count(), 2);
    }

    #[tokio::test]
    async fn unknown_quiz_is_not_found() {
        let api = InMemoryAssessmentApi::new();
        let err = api.fetch_quiz(QuizId::new(9)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn records_submissions_with_all_entries() {
        let api = InMemoryAssessmentApi::new();
        let quiz = build_quiz(1);
        api.insert_quiz(quiz.clone());

        let mut sheet = AnswerSheet::seeded_for(&quiz);
        sheet.set(QuestionId::new(1), "yes");
        api.submit_attempt(quiz.id(), &sheet).await.unwrap();

        let submissions = api.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(
            submissions[0].answers,
            vec![
                (QuestionId::new(1), "yes".to_owned()),
                (QuestionId::new(2), String::new()),
            ]
        );
    }
}
