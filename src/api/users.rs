use crate::api::AppState;
use crate::api::middleware::AuthUser;
use crate::api::schemas::users::{CreateUser, ListUsersParams, UserListResponse, UserView};
use crate::domain::user::{NewUser, Role, UserFilter};
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

pub async fn list_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> Result<impl IntoResponse> {
    state.current_user(&auth_user).await?;

    let filter = UserFilter { role: params.role, is_active: params.is_active, search: params.search };
    let users = state.directory_service.list(&filter).await?;

    Ok(Json(UserListResponse { users: users.into_iter().map(Into::into).collect() }))
}

pub async fn get_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.current_user(&auth_user).await?;

    let user = state.directory_service.get(id).await?;
    Ok(Json(UserView::from(user)))
}

/// Provisions a new account. Admin only.
///
/// # Errors
/// Returns `AppError::Forbidden` if the caller is not an admin.
/// Returns `AppError::Conflict` if the username is already taken.
pub async fn create_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;
    if caller.role != Role::Admin {
        return Err(AppError::Forbidden);
    }

    if payload.password.is_empty() {
        return Err(AppError::BadRequest("password must not be empty".to_string()));
    }

    let password_hash = state.auth_service.hash_password(&payload.password).await?;
    let user = state
        .directory_service
        .create_user(NewUser {
            username: payload.username,
            password_hash,
            full_name: payload.full_name,
            role: payload.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserView::from(user))))
}
