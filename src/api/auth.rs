use crate::api::AppState;
use crate::api::schemas::auth::{Login, Session};
use crate::error::Result;
use axum::{Json, extract::State, response::IntoResponse};

pub async fn login(State(state): State<AppState>, Json(payload): Json<Login>) -> Result<impl IntoResponse> {
    let session = state.auth_service.login(payload.username, payload.password).await?;
    Ok(Json(Session { token: session.token, expires_at: session.expires_at }))
}
