use chrono::{DateTime, Utc};
use std::fmt;

use edunex_core::model::{AnswerSheet, Question, QuestionId, Quiz};

use super::progress::AttemptProgress;

/// Remaining time at which the one-time low-time warning fires.
pub const LOW_TIME_THRESHOLD_SECS: u32 = 300;

/// What triggered a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    /// Explicit user action.
    Manual,
    /// Countdown reached zero.
    Automatic,
}

/// Result of advancing the countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time was decremented, nothing else to report.
    Ticking,
    /// Remaining time just crossed the low-time threshold; fires once.
    LowTime,
    /// Remaining time just reached zero; the driver must submit
    /// automatically. Fires once.
    Expired,
    /// The session no longer ticks (terminal, submitting, or already at
    /// zero). No state was mutated.
    Halted,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state for one bounded-time quiz attempt.
///
/// Lifecycle is `Active → Terminal` and nothing else: a session ends in
/// exactly one submission (manual or automatic), after which no answer or
/// timer mutation is observable.
pub struct AttemptSession {
    quiz: Quiz,
    answers: AnswerSheet,
    current: usize,
    remaining_seconds: u32,
    low_time_warned: bool,
    submission_in_flight: bool,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl AttemptSession {
    /// Creates a fresh attempt over `quiz`.
    ///
    /// Seeds one empty answer per question, points the cursor at the first
    /// question and arms the countdown at the full quiz duration.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    #[must_use]
    pub fn new(quiz: Quiz, started_at: DateTime<Utc>) -> Self {
        let answers = AnswerSheet::seeded_for(&quiz);
        let remaining_seconds = quiz.duration_seconds();
        Self {
            quiz,
            answers,
            current: 0,
            remaining_seconds,
            low_time_warned: false,
            submission_in_flight: false,
            started_at,
            ended_at: None,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        // The cursor is clamped to [0, question_count - 1] at every mutation
        // and Quiz guarantees at least one question.
        &self.quiz.questions()[self.current]
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn low_time_warned(&self) -> bool {
        self.low_time_warned
    }

    #[must_use]
    pub fn submission_in_flight(&self) -> bool {
        self.submission_in_flight
    }

    /// True once a submission has ended the session.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.ended_at.is_some()
    }

    fn is_locked(&self) -> bool {
        self.is_terminal() || self.submission_in_flight
    }

    /// Returns a summary of the current attempt progress.
    #[must_use]
    pub fn progress(&self) -> AttemptProgress {
        AttemptProgress {
            total: self.quiz.question_count(),
            answered: self.answers.answered_count(),
            unanswered: self.answers.unanswered_count(),
            current_index: self.current,
            remaining_seconds: self.remaining_seconds,
            is_complete: self.is_terminal(),
        }
    }

    //
    // ─── MUTATION ──────────────────────────────────────────────────────────
    //

    /// Overwrites the answer for `question_id`.
    ///
    /// Returns `false` without changing anything once a submission has been
    /// dispatched, or when the id does not belong to this quiz. The answer
    /// content is deliberately not validated against the question kind.
    pub fn set_answer(&mut self, question_id: QuestionId, answer: impl Into<String>) -> bool {
        if self.is_locked() {
            return false;
        }
        self.answers.set(question_id, answer)
    }

    /// Moves the cursor to `index`, clamping silently at the last question.
    pub fn go_to(&mut self, index: usize) {
        self.current = index.min(self.quiz.question_count() - 1);
    }

    /// Moves the cursor forward; clamps at the last question.
    pub fn next(&mut self) {
        self.go_to(self.current.saturating_add(1));
    }

    /// Moves the cursor back; clamps at the first question.
    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Advances the countdown by one second.
    ///
    /// Yields [`TickOutcome::LowTime`] exactly once when the remaining time
    /// first crosses the threshold, [`TickOutcome::Expired`] exactly once
    /// when it reaches zero, and [`TickOutcome::Halted`] (a no-op) for every
    /// call after that or once a submission is underway.
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_locked() || self.remaining_seconds == 0 {
            return TickOutcome::Halted;
        }

        self.remaining_seconds -= 1;
        if self.remaining_seconds == 0 {
            return TickOutcome::Expired;
        }
        if self.remaining_seconds <= LOW_TIME_THRESHOLD_SECS && !self.low_time_warned {
            self.low_time_warned = true;
            return TickOutcome::LowTime;
        }
        TickOutcome::Ticking
    }

    //
    // ─── SUBMISSION BRACKET ────────────────────────────────────────────────
    //

    /// Marks a submission as in flight.
    ///
    /// Returns `false` when one is already in flight or the session is
    /// terminal; the caller must then skip the network call entirely. This
    /// is the guard that makes double submission a no-op.
    pub fn begin_submission(&mut self) -> bool {
        if self.is_locked() {
            return false;
        }
        self.submission_in_flight = true;
        true
    }

    /// Ends the session after a successful submission.
    pub fn complete_submission(&mut self, at: DateTime<Utc>) {
        self.submission_in_flight = false;
        self.ended_at = Some(at);
    }

    /// Unwinds a failed submission.
    ///
    /// A manual submission becomes retryable again; an automatic one ends
    /// the session anyway — timeout submission is best-effort and never
    /// retried.
    pub fn abort_submission(&mut self, mode: SubmitMode, at: DateTime<Utc>) {
        self.submission_in_flight = false;
        if mode == SubmitMode::Automatic {
            self.ended_at = Some(at);
        }
    }
}

impl fmt::Debug for AttemptSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttemptSession")
            .field("quiz_id", &self.quiz.id())
            .field("questions", &self.quiz.question_count())
            .field("current", &self.current)
            .field("remaining_seconds", &self.remaining_seconds)
            .field("low_time_warned", &self.low_time_warned)
            .field("submission_in_flight", &self.submission_in_flight)
            .field("ended_at", &self.ended_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use edunex_core::model::{Question, QuestionKind, QuizId};
    use edunex_core::time::fixed_now;

    fn build_quiz(question_count: u64, duration_minutes: u32) -> Quiz {
        let questions = (1..=question_count)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    format!("Q{id}"),
                    QuestionKind::ShortAnswer,
                    Vec::new(),
                    1,
                )
            })
            .collect();
        Quiz::new(
            QuizId::new(1),
            "Quiz",
            "Course",
            duration_minutes,
            question_count as u32,
            questions,
        )
        .unwrap()
    }

    fn build_session(question_count: u64, duration_minutes: u32) -> AttemptSession {
        AttemptSession::new(build_quiz(question_count, duration_minutes), fixed_now())
    }

    #[test]
    fn seeds_answers_and_countdown_on_creation() {
        let session = build_session(4, 20);

        assert_eq!(session.answers().len(), 4);
        assert_eq!(session.answers().answered_count(), 0);
        assert_eq!(session.remaining_seconds(), 1200);
        assert_eq!(session.current_index(), 0);
        assert!(!session.is_terminal());
        assert!(!session.low_time_warned());
    }

    #[test]
    fn go_to_clamps_past_last_question() {
        let mut session = build_session(10, 20);

        session.go_to(999);
        assert_eq!(session.current_index(), 9);

        session.go_to(3);
        assert_eq!(session.current_index(), 3);
    }

    #[test]
    fn previous_clamps_at_first_question() {
        let mut session = build_session(10, 20);

        session.previous();
        session.previous();
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn next_clamps_at_last_question() {
        let mut session = build_session(2, 20);

        session.next();
        session.next();
        session.next();
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.current_question().id(), QuestionId::new(2));
    }

    #[test]
    fn ticks_count_down_without_going_negative() {
        let mut session = build_session(1, 1);

        for _ in 0..59 {
            session.tick();
        }
        assert_eq!(session.remaining_seconds(), 1);

        assert_eq!(session.tick(), TickOutcome::Expired);
        assert_eq!(session.remaining_seconds(), 0);

        // Further ticks are no-ops and never re-fire expiry.
        assert_eq!(session.tick(), TickOutcome::Halted);
        assert_eq!(session.tick(), TickOutcome::Halted);
        assert_eq!(session.remaining_seconds(), 0);
    }

    #[test]
    fn low_time_warning_fires_exactly_once() {
        let mut session = build_session(1, 6);
        assert_eq!(session.remaining_seconds(), 360);

        let mut warnings = 0;
        for _ in 0..120 {
            if session.tick() == TickOutcome::LowTime {
                warnings += 1;
            }
        }

        assert_eq!(warnings, 1);
        assert!(session.low_time_warned());
        assert_eq!(session.remaining_seconds(), 240);
    }

    #[test]
    fn low_time_warning_fires_at_threshold_crossing() {
        let mut session = build_session(1, 6);

        // 360 -> 301: still above the threshold.
        for _ in 0..59 {
            assert_eq!(session.tick(), TickOutcome::Ticking);
        }
        assert_eq!(session.remaining_seconds(), 301);

        // 301 -> 300: the one-time warning.
        assert_eq!(session.tick(), TickOutcome::LowTime);
        assert_eq!(session.tick(), TickOutcome::Ticking);
    }

    #[test]
    fn short_quiz_warns_on_first_tick() {
        let mut session = build_session(1, 1);
        assert_eq!(session.tick(), TickOutcome::LowTime);
    }

    #[test]
    fn set_answer_overwrites_and_reports_unknown_ids() {
        let mut session = build_session(2, 20);

        assert!(session.set_answer(QuestionId::new(1), "first"));
        assert!(session.set_answer(QuestionId::new(1), "second"));
        assert!(!session.set_answer(QuestionId::new(42), "stray"));

        assert_eq!(session.answers().get(QuestionId::new(1)), Some("second"));
        assert_eq!(session.answers().len(), 2);
    }

    #[test]
    fn terminal_session_rejects_all_mutation() {
        let mut session = build_session(2, 20);
        assert!(session.begin_submission());
        session.complete_submission(fixed_now());

        assert!(session.is_terminal());
        assert!(!session.set_answer(QuestionId::new(1), "late"));
        assert_eq!(session.tick(), TickOutcome::Halted);
        assert_eq!(session.remaining_seconds(), 1200);
        assert!(!session.begin_submission());
    }

    #[test]
    fn double_begin_submission_is_a_noop() {
        let mut session = build_session(1, 20);

        assert!(session.begin_submission());
        assert!(!session.begin_submission());
        assert!(session.submission_in_flight());
    }

    #[test]
    fn in_flight_submission_freezes_answers_and_timer() {
        let mut session = build_session(1, 20);
        assert!(session.begin_submission());

        assert!(!session.set_answer(QuestionId::new(1), "late"));
        assert_eq!(session.tick(), TickOutcome::Halted);
    }

    #[test]
    fn manual_abort_allows_retry() {
        let mut session = build_session(1, 20);

        assert!(session.begin_submission());
        session.abort_submission(SubmitMode::Manual, fixed_now());

        assert!(!session.is_terminal());
        assert!(session.begin_submission());
    }

    #[test]
    fn automatic_abort_ends_the_session() {
        let mut session = build_session(1, 20);

        assert!(session.begin_submission());
        session.abort_submission(SubmitMode::Automatic, fixed_now());

        assert!(session.is_terminal());
        assert!(!session.begin_submission());
    }

    #[test]
    fn progress_tracks_answers_and_countdown() {
        let mut session = build_session(3, 20);
        session.set_answer(QuestionId::new(2), "x");
        session.tick();
        session.go_to(2);

        let progress = session.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.unanswered, 2);
        assert_eq!(progress.current_index, 2);
        assert_eq!(progress.remaining_seconds, 1199);
        assert!(!progress.is_complete);
    }
}
