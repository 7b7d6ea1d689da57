use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resume {
    #[serde(rename = "resume_id")]
    pub id: Uuid,
    pub user_id: String,
    pub object_key: String,
    pub parsed_skills: Vec<String>,
    pub parsed_projects: Vec<String>,
    pub recommended_roles: Vec<String>,
    pub selected_role: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl Resume {
    /// Skills and projects rendered as the prompt context for question generation.
    pub fn generation_context(&self) -> String {
        format!(
            "Skills: {}. Projects: {}",
            self.parsed_skills.join(", "),
            self.parsed_projects.join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeExtraction {
    pub skills: Vec<String>,
    pub projects: Vec<String>,
    pub recommended_roles: Vec<String>,
}
