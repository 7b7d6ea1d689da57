use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::resume::ResumeExtraction;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResumeResponse {
    pub message: String,
    pub resume_id: Uuid,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResumeResponse {
    pub message: String,
    pub data: ResumeExtraction,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SelectRoleRequest {
    #[validate(required(message = "resumeId is required"))]
    pub resume_id: Option<Uuid>,
    #[validate(required(message = "role is required"), length(min = 1, message = "role must not be empty"))]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
