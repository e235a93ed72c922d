use std::sync::Arc;

use api::AssessmentApi;
use edunex_core::model::QuizId;

use crate::Clock;
use crate::error::AttemptError;
use super::session::{AttemptSession, SubmitMode};

/// How a submit call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Exactly one network submission was sent and acknowledged.
    Submitted,
    /// A submission was already in flight or done; nothing was sent.
    AlreadySubmitted,
}

/// Orchestrates attempt load and submission against the assessment API.
#[derive(Clone)]
pub struct AttemptWorkflow {
    clock: Clock,
    api: Arc<dyn AssessmentApi>,
}

impl AttemptWorkflow {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn AssessmentApi>) -> Self {
        Self { clock, api }
    }

    /// Loads the quiz and opens a fresh attempt session.
    ///
    /// A load failure aborts session creation; no partial session is ever
    /// handed out.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Api` for not-found, unauthorized, or network
    /// failures from the quiz fetch.
    pub async fn start_attempt(&self, quiz_id: QuizId) -> Result<AttemptSession, AttemptError> {
        let quiz = self.api.fetch_quiz(quiz_id).await?;
        tracing::info!(
            quiz_id = %quiz_id,
            questions = quiz.question_count(),
            duration_minutes = quiz.duration_minutes(),
            "attempt started"
        );
        Ok(AttemptSession::new(quiz, self.clock.now()))
    }

    /// Submits the attempt's full answer set.
    ///
    /// A session with a submission already in flight (or already terminal)
    /// is left untouched and no network call is made. On success the session
    /// ends. On failure a manual submission is unwound so the user may
    /// retry; an automatic submission ends the session anyway, since timeout
    /// submission is best-effort and never retried.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Api` when the submit call fails.
    pub async fn submit(
        &self,
        session: &mut AttemptSession,
        mode: SubmitMode,
    ) -> Result<SubmitOutcome, AttemptError> {
        if !session.begin_submission() {
            return Ok(SubmitOutcome::AlreadySubmitted);
        }

        let quiz_id = session.quiz().id();
        match self.api.submit_attempt(quiz_id, session.answers()).await {
            Ok(()) => {
                session.complete_submission(self.clock.now());
                tracing::info!(quiz_id = %quiz_id, mode = ?mode, "attempt submitted");
                Ok(SubmitOutcome::Submitted)
            }
            Err(err) => {
                tracing::warn!(quiz_id = %quiz_id, mode = ?mode, error = %err, "submit failed");
                session.abort_submission(mode, self.clock.now());
                Err(AttemptError::Api(err))
            }
        }
    }
}
