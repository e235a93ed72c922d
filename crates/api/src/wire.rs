//! Wire shapes owned by the assessment service.
//!
//! Optional backend fields are modeled as explicit `Option`s here and resolved
//! once during conversion, instead of being probed defensively at call sites.

use serde::{Deserialize, Serialize};

use edunex_core::model::{
    Question, QuestionId, QuestionKind, Quiz, QuizError, QuizId,
};

use crate::client::QuizOverview;

// The backend defaults quiz duration to 30 minutes when unset.
const DEFAULT_DURATION_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionTypeDto {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

impl From<QuestionTypeDto> for QuestionKind {
    fn from(value: QuestionTypeDto) -> Self {
        match value {
            QuestionTypeDto::MultipleChoice => QuestionKind::MultipleChoice,
            QuestionTypeDto::TrueFalse => QuestionKind::TrueFalse,
            QuestionTypeDto::ShortAnswer => QuestionKind::ShortAnswer,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: u64,
    pub question_text: String,
    pub question_type: QuestionTypeDto,
    /// Only present for multiple-choice questions.
    pub options: Option<Vec<String>>,
    pub points: Option<u32>,
}

impl QuestionDto {
    #[must_use]
    pub fn into_question(self) -> Question {
        Question::new(
            QuestionId::new(self.id),
            self.question_text,
            self.question_type.into(),
            self.options.unwrap_or_default(),
            self.points.unwrap_or(1),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDto {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub course_name: Option<String>,
    /// Some backend builds serialize this as `duration`.
    #[serde(alias = "duration")]
    pub duration_minutes: Option<u32>,
    pub total_points: Option<u32>,
    #[serde(default)]
    pub questions: Vec<QuestionDto>,
}

impl QuizDto {
    /// Converts the wire payload into the domain `Quiz`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` when the payload violates quiz invariants
    /// (no questions, blank title, duplicate question ids).
    pub fn into_quiz(self) -> Result<Quiz, QuizError> {
        let questions: Vec<Question> = self
            .questions
            .into_iter()
            .map(QuestionDto::into_question)
            .collect();
        let total_points = match self.total_points {
            Some(points) => points,
            None => questions.iter().map(Question::points).sum(),
        };

        Quiz::new(
            QuizId::new(self.id),
            self.title,
            self.course_name.unwrap_or_default(),
            self.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            total_points,
            questions,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOverviewDto {
    pub id: u64,
    pub title: String,
    pub course_name: Option<String>,
    #[serde(alias = "duration")]
    pub duration_minutes: Option<u32>,
    pub total_points: Option<u32>,
}

impl QuizOverviewDto {
    #[must_use]
    pub fn into_overview(self) -> QuizOverview {
        QuizOverview {
            id: QuizId::new(self.id),
            title: self.title,
            course_name: self.course_name.unwrap_or_default(),
            duration_minutes: self.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            total_points: self.total_points.unwrap_or(0),
        }
    }
}

/// One answer in the submit payload, empty string for unanswered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerDto {
    pub question_id: u64,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestDto {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseDto {
    pub token: String,
    pub id: Option<u64>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_quiz_payload() {
        let payload = serde_json::json!({
            "id": 4,
            "title": "Midterm",
            "courseName": "Databases",
            "durationMinutes": 45,
            "totalPoints": 20,
            "questions": [
                {
                    "id": 11,
                    "questionText": "Pick one",
                    "questionType": "MULTIPLE_CHOICE",
                    "options": ["a", "b", "c"],
                    "points": 10
                },
                {
                    "id": 12,
                    "questionText": "True?",
                    "questionType": "TRUE_FALSE",
                    "points": 10
                }
            ]
        });

        let dto: QuizDto = serde_json::from_value(payload).unwrap();
        let quiz = dto.into_quiz().unwrap();

        assert_eq!(quiz.id(), QuizId::new(4));
        assert_eq!(quiz.course_name(), "Databases");
        assert_eq!(quiz.duration_seconds(), 2700);
        assert_eq!(quiz.question_count(), 2);
        assert_eq!(quiz.questions()[0].options().len(), 3);
        assert!(quiz.questions()[1].options().is_empty());
    }

    #[test]
    fn fills_optional_fields_with_defaults() {
        let payload = serde_json::json!({
            "id": 1,
            "title": "Pop quiz",
            "questions": [
                { "id": 1, "questionText": "Q", "questionType": "SHORT_ANSWER", "points": 3 },
                { "id": 2, "questionText": "Q", "questionType": "SHORT_ANSWER" }
            ]
        });

        let quiz: Quiz = serde_json::from_value::<QuizDto>(payload)
            .unwrap()
            .into_quiz()
            .unwrap();

        assert_eq!(quiz.course_name(), "");
        assert_eq!(quiz.duration_minutes(), DEFAULT_DURATION_MINUTES);
        // Missing totalPoints falls back to the per-question sum (3 + 1).
        assert_eq!(quiz.total_points(), 4);
    }

    #[test]
    fn accepts_duration_alias() {
        let payload = serde_json::json!({
            "id": 2,
            "title": "Aliased",
            "duration": 15,
            "questions": [
                { "id": 1, "questionText": "Q", "questionType": "SHORT_ANSWER" }
            ]
        });

        let quiz = serde_json::from_value::<QuizDto>(payload)
            .unwrap()
            .into_quiz()
            .unwrap();
        assert_eq!(quiz.duration_minutes(), 15);
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let payload = serde_json::json!({
            "id": 3,
            "title": "Hollow",
            "questions": []
        });

        let err = serde_json::from_value::<QuizDto>(payload)
            .unwrap()
            .into_quiz()
            .unwrap_err();
        assert_eq!(err, QuizError::NoQuestions);
    }

    #[test]
    fn submit_answer_serializes_camel_case() {
        let dto = SubmitAnswerDto {
            question_id: 7,
            answer: String::new(),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json, serde_json::json!({ "questionId": 7, "answer": "" }));
    }
}
