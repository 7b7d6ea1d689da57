use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "question_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    Mcq,
    OpenEnded,
    Code,
}

impl QuestionType {
    /// Fixed-choice questions are graded locally against the stored answer.
    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionType::Mcq)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Question {
    #[serde(rename = "question_id")]
    pub id: Uuid,
    pub interview_id: Uuid,
    pub round_id: Uuid,
    pub question_text: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Read-facing projection of a question: everything except the correct answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub question_id: Uuid,
    pub interview_id: Uuid,
    pub round_id: Uuid,
    pub question_text: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            question_id: q.id,
            interview_id: q.interview_id,
            round_id: q.round_id,
            question_text: q.question_text,
            question_type: q.question_type,
            options: q.options,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub interview_id: Uuid,
    pub round_id: Uuid,
    pub question_text: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
}
