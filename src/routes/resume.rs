use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use bytes::Bytes;
use uuid::Uuid;
use validator::Validate;

use crate::dto::resume_dto::{
    MessageResponse, ParseResumeResponse, SelectRoleRequest, UploadResumeResponse,
};
use crate::error::{Error, Result};
use crate::middleware::identity::UserIdentity;
use crate::models::resume::Resume;
use crate::AppState;

const RESUME_FIELD: &str = "resume";

pub async fn upload_resume(
    State(state): State<AppState>,
    Extension(UserIdentity(user_id)): Extension<UserIdentity>,
    mut multipart: Multipart,
) -> Result<Json<UploadResumeResponse>> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let data = field.bytes().await?;
        upload = Some((file_name, data));
    }

    let (file_name, data) = upload
        .filter(|(_, data)| !data.is_empty())
        .ok_or_else(|| Error::BadRequest("No file uploaded".to_string()))?;
    tracing::info!(%file_name, size = data.len(), "Receiving resume upload");

    let (resume, stored) = state
        .resume_service()
        .upload(&user_id, &file_name, data)
        .await?;

    Ok(Json(UploadResumeResponse {
        message: "Resume uploaded successfully".to_string(),
        resume_id: resume.id,
        url: stored.location,
    }))
}

pub async fn parse_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ParseResumeResponse>> {
    let data = state.resume_service().parse(resume_id).await?;
    Ok(Json(ParseResumeResponse {
        message: "Parsing successful".to_string(),
        data,
    }))
}

pub async fn get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<Resume>> {
    Ok(Json(state.resume_service().get(resume_id).await?))
}

pub async fn select_role(
    State(state): State<AppState>,
    Json(payload): Json<SelectRoleRequest>,
) -> Result<Json<MessageResponse>> {
    payload.validate()?;
    let (Some(resume_id), Some(role)) = (payload.resume_id, payload.role) else {
        return Err(Error::BadRequest("Missing resumeId or role".to_string()));
    };

    state.resume_service().select_role(resume_id, &role).await?;
    Ok(Json(MessageResponse {
        message: "Role saved successfully".to_string(),
    }))
}
