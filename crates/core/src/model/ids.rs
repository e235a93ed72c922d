use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

//
// ─── PARSE ERROR ───────────────────────────────────────────────────────────────
//

/// An id's text form could not be parsed.
///
/// Carries the rejected input so flag and environment errors can echo it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
    raw: String,
}

impl ParseIdError {
    fn new(kind: &'static str, raw: &str) -> Self {
        Self {
            kind,
            raw: raw.to_owned(),
        }
    }
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} is not a valid {}", self.raw, self.kind)
    }
}

impl std::error::Error for ParseIdError {}

//
// ─── QUIZ ID ───────────────────────────────────────────────────────────────────
//

/// Backend-assigned identifier of a quiz.
///
/// Travels as a plain decimal: `Display` renders the form used in
/// `/quizzes/{id}` paths, and `FromStr` accepts the same form from the
/// `--quiz-id` flag and `EDUNEX_QUIZ_ID`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuizId(u64);

impl QuizId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuizId({})", self.0)
    }
}

impl fmt::Display for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuizId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| ParseIdError::new("quiz id", s))
    }
}

//
// ─── QUESTION ID ───────────────────────────────────────────────────────────────
//

/// Backend-assigned identifier of a question within a quiz.
///
/// Answer entries are keyed by this id; it also names questions in the
/// submission payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(u64);

impl QuestionId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| ParseIdError::new("question id", s))
    }
}

//
// ─── USER ID ───────────────────────────────────────────────────────────────────
//

/// Backend-assigned identifier of a user (student or instructor).
///
/// Parsed from the `--student-id` flag and `EDUNEX_STUDENT_ID`, and rendered
/// into `/quizzes/student/{id}` paths.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(u64);

impl UserId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| ParseIdError::new("user id", s))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_id_parses_flag_text() {
        assert_eq!("17".parse::<QuizId>().unwrap(), QuizId::new(17));
    }

    #[test]
    fn quiz_id_rejection_echoes_the_input() {
        let err = "latest".parse::<QuizId>().unwrap_err();
        assert_eq!(err.to_string(), "\"latest\" is not a valid quiz id");
    }

    #[test]
    fn user_id_rejects_negative_text() {
        assert!("-3".parse::<UserId>().is_err());
    }

    #[test]
    fn ids_display_as_plain_decimals_for_url_paths() {
        assert_eq!(QuizId::new(42).to_string(), "42");
        assert_eq!(UserId::new(7).to_string(), "7");
    }

    #[test]
    fn question_id_debug_names_the_type() {
        assert_eq!(format!("{:?}", QuestionId::new(3)), "QuestionId(3)");
    }

    #[test]
    fn quiz_id_display_round_trips_through_parse() {
        let id = QuizId::new(9000);
        assert_eq!(id.to_string().parse::<QuizId>().unwrap(), id);
    }
}
