use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "interview_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewStatus {
    Started,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Interview {
    #[serde(rename = "interview_id")]
    pub id: Uuid,
    pub user_id: String,
    pub resume_id: Uuid,
    pub job_role: String,
    pub status: InterviewStatus,
    pub final_score: Option<Decimal>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Interview {
    pub fn is_completed(&self) -> bool {
        self.status == InterviewStatus::Completed
    }
}

#[derive(Debug, Clone)]
pub struct NewInterview {
    pub user_id: String,
    pub resume_id: Uuid,
    pub job_role: String,
}
