use crate::api::AppState;
use crate::api::middleware::AuthUser;
use crate::api::schemas::relations::{
    CreateRelation, ListRelationsParams, RelationListResponse, RelationView, UpdateRelation,
};
use crate::domain::relation::{NewRelation, RelationFilter, RelationPatch};
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| AppError::BadRequest(format!("{field} is required")))
}

/// Parents and students see their own links only; staff see everything.
pub async fn list_relations(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListRelationsParams>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;

    let filter = RelationFilter {
        parent_id: params.parent_id,
        student_id: params.student_id,
        is_active: params.is_active,
    };
    let relations = state.relation_service.list(&caller, filter).await?;

    Ok(Json(RelationListResponse { relations: relations.into_iter().map(Into::into).collect() }))
}

pub async fn create_relation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateRelation>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;

    let new = NewRelation {
        parent_id: required(payload.parent_id, "parent_id")?,
        student_id: required(payload.student_id, "student_id")?,
        kind: required(payload.kind, "kind")?,
        is_primary_contact: payload.is_primary_contact,
    };
    let relation = state.relation_service.create(&caller, new).await?;

    Ok((StatusCode::CREATED, Json(RelationView::from(relation))))
}

pub async fn get_relation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;
    let relation = state.relation_service.get(&caller, id).await?;
    Ok(Json(RelationView::from(relation)))
}

pub async fn update_relation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRelation>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;

    let patch = RelationPatch {
        is_primary_contact: payload.is_primary_contact,
        is_active: payload.is_active,
    };
    let relation = state.relation_service.update(&caller, id, patch).await?;

    Ok(Json(RelationView::from(relation)))
}

pub async fn delete_relation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;
    state.relation_service.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
