pub mod health;
pub mod interview;
pub mod resume;

use axum::{
    routing::{get, post},
    Router,
};

use crate::middleware::identity::resolve_user;
use crate::AppState;

/// The JSON API. Static file serving and transport layers are added by the binary.
pub fn api_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/upload-resume", post(resume::upload_resume))
        .route("/api/parse-resume/:resume_id", post(resume::parse_resume))
        .route("/api/resume/:resume_id", get(resume::get_resume))
        .route("/api/select-role", post(resume::select_role))
        .route("/api/start-interview", post(interview::start_interview))
        .route(
            "/api/interview/:interview_id/status",
            get(interview::interview_status),
        )
        .route(
            "/api/interview/:interview_id/round/:round_id/generate",
            post(interview::generate_questions),
        )
        .route(
            "/api/interview/:interview_id/round/:round_id/questions",
            get(interview::get_questions),
        )
        .route(
            "/api/interview/:interview_id/round/:round_id/answers",
            get(interview::get_round_answers),
        )
        .route("/api/interview/:interview_id/answers", get(interview::get_answers))
        .route("/api/interview/:interview_id/submit", post(interview::submit_answer))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            resolve_user,
        ));

    Router::new()
        .route("/health", get(health::health))
        .merge(api)
        .with_state(state)
}
