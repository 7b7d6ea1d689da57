use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::interview_dto::{
    AnswersResponse, GeneratedQuestionsResponse, QuestionsResponse, StartInterviewRequest,
    StartInterviewResponse, SubmitAnswerRequest,
};
use crate::error::{Error, Result};
use crate::middleware::identity::UserIdentity;
use crate::services::interview_service::{AnswerSubmission, SessionSnapshot, SubmissionResult};
use crate::AppState;

pub async fn start_interview(
    State(state): State<AppState>,
    Extension(UserIdentity(user_id)): Extension<UserIdentity>,
    Json(payload): Json<StartInterviewRequest>,
) -> Result<Json<StartInterviewResponse>> {
    payload.validate()?;
    let (Some(resume_id), Some(job_role)) = (payload.resume_id, payload.job_role) else {
        return Err(Error::BadRequest("Missing resumeId or jobRole".to_string()));
    };

    let (interview, _rounds) = state
        .interview_service()
        .start_interview(&user_id, resume_id, &job_role)
        .await?;

    Ok(Json(StartInterviewResponse {
        message: "Interview Session Created".to_string(),
        interview_id: interview.id,
        status: interview.status,
    }))
}

pub async fn interview_status(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>> {
    Ok(Json(state.interview_service().status(interview_id).await?))
}

pub async fn generate_questions(
    State(state): State<AppState>,
    Path((interview_id, round_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<GeneratedQuestionsResponse>> {
    let questions = state
        .question_service()
        .generate_questions(interview_id, round_id)
        .await?;
    Ok(Json(GeneratedQuestionsResponse { questions }))
}

pub async fn get_questions(
    State(state): State<AppState>,
    Path((interview_id, round_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<QuestionsResponse>> {
    let questions = state
        .question_service()
        .fetch_questions(interview_id, round_id)
        .await?;
    Ok(Json(QuestionsResponse { questions }))
}

pub async fn get_round_answers(
    State(state): State<AppState>,
    Path((interview_id, round_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AnswersResponse>> {
    let answers = state
        .interview_service()
        .list_answers(interview_id, Some(round_id))
        .await?;
    Ok(Json(AnswersResponse { answers }))
}

pub async fn get_answers(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<AnswersResponse>> {
    let answers = state
        .interview_service()
        .list_answers(interview_id, None)
        .await?;
    Ok(Json(AnswersResponse { answers }))
}

pub async fn submit_answer(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmissionResult>> {
    payload.validate()?;
    let (Some(round_id), Some(question_id), Some(answer)) =
        (payload.round_id, payload.question_id, payload.answer)
    else {
        return Err(Error::BadRequest("Missing roundId, questionId or answer".to_string()));
    };

    let result = state
        .interview_service()
        .submit_answer(
            interview_id,
            AnswerSubmission {
                round_id,
                question_id,
                answer,
            },
        )
        .await?;
    Ok(Json(result))
}
