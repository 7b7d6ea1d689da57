//! Persistence contracts used by the interview engine.
//!
//! Round and interview transitions are conditional: each returns `true` only
//! for the caller that actually moved the row, so repeating a transition is
//! harmless.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::Result;
use crate::models::answer::{Answer, NewAnswer};
use crate::models::interview::{Interview, NewInterview};
use crate::models::question::{NewQuestion, Question};
use crate::models::resume::{Resume, ResumeExtraction};
use crate::models::round::{Round, RoundPlan};

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn create_resume(&self, user_id: &str, object_key: &str) -> Result<Resume>;

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>>;

    /// Fails with `NotFound` when the résumé does not exist.
    async fn update_parsed_data(&self, id: Uuid, extraction: &ResumeExtraction) -> Result<Resume>;

    /// Fails with `NotFound` when the résumé does not exist.
    async fn update_selected_role(&self, id: Uuid, role: &str) -> Result<Resume>;
}

#[async_trait]
pub trait InterviewStore: Send + Sync {
    /// Creates the interview and one `PENDING` round per plan entry, in order.
    async fn create_interview(
        &self,
        new: NewInterview,
        plan: &[RoundPlan],
    ) -> Result<(Interview, Vec<Round>)>;

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>>;

    /// Rounds ordered by creation position.
    async fn get_rounds(&self, interview_id: Uuid) -> Result<Vec<Round>>;

    /// `PENDING -> ACTIVE`, refused while another round of the interview is active.
    async fn activate_round(&self, round_id: Uuid, at: DateTime<Utc>) -> Result<bool>;

    /// `ACTIVE -> COMPLETED`.
    async fn complete_round(&self, round_id: Uuid, at: DateTime<Utc>) -> Result<bool>;

    /// `STARTED -> COMPLETED` with the final score and feedback.
    async fn finalize_interview(
        &self,
        id: Uuid,
        final_score: Decimal,
        feedback: &str,
        at: DateTime<Utc>,
    ) -> Result<bool>;
}

#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Returns `None` when the interview already holds a question with the same text.
    async fn insert_question(&self, new: NewQuestion) -> Result<Option<Question>>;

    async fn get_question(&self, id: Uuid) -> Result<Option<Question>>;

    /// Questions of one round in creation order.
    async fn get_questions(&self, interview_id: Uuid, round_id: Uuid) -> Result<Vec<Question>>;

    /// Questions of every round of the interview.
    async fn get_all_questions(&self, interview_id: Uuid) -> Result<Vec<Question>>;

    /// Creates the answer, or replaces the existing answer to the same question.
    async fn save_answer(&self, new: NewAnswer) -> Result<Answer>;

    /// Answers of every round of the interview.
    async fn get_answers(&self, interview_id: Uuid) -> Result<Vec<Answer>>;
}

pub trait Store: ResumeStore + InterviewStore + QuestionStore {}

impl<T> Store for T where T: ResumeStore + InterviewStore + QuestionStore {}
