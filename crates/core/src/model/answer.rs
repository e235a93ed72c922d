use crate::model::ids::QuestionId;
use crate::model::quiz::Quiz;

/// One respondent answer, keyed by question id.
///
/// An empty string means the question has not been answered yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerEntry {
    question_id: QuestionId,
    answer: String,
}

impl AnswerEntry {
    #[must_use]
    pub fn question_id(&self) -> QuestionId {
        self.question_id
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        !self.answer.is_empty()
    }
}

/// The full answer set for one attempt.
///
/// Seeded with exactly one empty entry per question, in question order.
/// Entries are only ever overwritten, never added or removed, so the sheet
/// size always equals the quiz question count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSheet {
    entries: Vec<AnswerEntry>,
}

impl AnswerSheet {
    /// Seeds an empty sheet for every question of `quiz`.
    #[must_use]
    pub fn seeded_for(quiz: &Quiz) -> Self {
        let entries = quiz
            .questions()
            .iter()
            .map(|question| AnswerEntry {
                question_id: question.id(),
                answer: String::new(),
            })
            .collect();
        Self { entries }
    }

    /// Overwrites the answer for `question_id`.
    ///
    /// Returns `false` (and changes nothing) when the id does not belong to
    /// the sheet; the entry set is fixed at seeding time. The answer content
    /// itself is not checked against the question kind.
    pub fn set(&mut self, question_id: QuestionId, answer: impl Into<String>) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.question_id == question_id)
        {
            Some(entry) => {
                entry.answer = answer.into();
                true
            }
            None => false,
        }
    }

    /// Current answer for `question_id`, if the id belongs to the sheet.
    #[must_use]
    pub fn get(&self, question_id: QuestionId) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.question_id == question_id)
            .map(AnswerEntry::answer)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in question order.
    #[must_use]
    pub fn entries(&self) -> &[AnswerEntry] {
        &self.entries
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_answered()).count()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.entries.len() - self.answered_count()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
