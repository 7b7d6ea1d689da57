use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Answer {
    #[serde(rename = "answer_id")]
    pub id: Uuid,
    pub interview_id: Uuid,
    pub round_id: Uuid,
    pub question_id: Uuid,
    pub user_answer: String,
    pub score: Decimal,
    pub feedback: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub interview_id: Uuid,
    pub round_id: Uuid,
    pub question_id: Uuid,
    pub user_answer: String,
    pub score: Decimal,
    pub feedback: String,
}
