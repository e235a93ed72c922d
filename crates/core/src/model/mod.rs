mod answer;
mod ids;
mod quiz;

pub use ids::{ParseIdError, QuestionId, QuizId, UserId};

pub use answer::{AnswerEntry, AnswerSheet};
pub use quiz::{Question, QuestionKind, Quiz, QuizError};
