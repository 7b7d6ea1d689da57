use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::answer::Answer;
use crate::models::interview::InterviewStatus;
use crate::models::question::{PublicQuestion, Question};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartInterviewRequest {
    #[validate(required(message = "resumeId is required"))]
    pub resume_id: Option<Uuid>,
    #[validate(required(message = "jobRole is required"), length(min = 1, message = "jobRole must not be empty"))]
    pub job_role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartInterviewResponse {
    pub message: String,
    pub interview_id: Uuid,
    pub status: InterviewStatus,
}

/// Only the identifiers and the answer are read. Question type, options and
/// the correct answer are always taken from the stored question.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    #[validate(required(message = "roundId is required"))]
    pub round_id: Option<Uuid>,
    #[validate(required(message = "questionId is required"))]
    pub question_id: Option<Uuid>,
    #[validate(required(message = "answer is required"))]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuestionsResponse {
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswersResponse {
    pub answers: Vec<Answer>,
}
