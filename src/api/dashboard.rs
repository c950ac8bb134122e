use crate::api::AppState;
use crate::api::middleware::AuthUser;
use crate::api::schemas::dashboard::DashboardResponse;
use crate::error::Result;
use axum::{Json, extract::State, response::IntoResponse};

/// Returns the role-specific dashboard for the caller.
pub async fn dashboard(auth_user: AuthUser, State(state): State<AppState>) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;
    let view = state.dashboard_service.dashboard(&caller).await?;
    Ok(Json(DashboardResponse::from(view)))
}
