use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The acting user. Not authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity(pub String);

/// Takes the user from `x-user-id` when present and non-empty, otherwise the
/// configured default user.
pub async fn resolve_user(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let user = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| state.default_user_id.clone());

    req.extensions_mut().insert(UserIdentity(user));
    next.run(req).await
}
