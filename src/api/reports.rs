use crate::api::AppState;
use crate::api::middleware::AuthUser;
use crate::api::schemas::reports::{
    CreateReport, ListReportsParams, ReportListResponse, ReportView, SetReportStatus, UpdateReport,
};
use crate::domain::report::{ReportFilter, ReportPatch};
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

/// Lists the caller's own reports, newest first. Employee only.
pub async fn list_reports(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListReportsParams>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;

    let filter = ReportFilter {
        report_type: params.report_type,
        status: params.status,
        search: params.search,
    };
    let reports = state.report_service.list(&caller, &filter).await?;

    Ok(Json(ReportListResponse { reports: reports.into_iter().map(Into::into).collect() }))
}

pub async fn create_report(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateReport>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;

    let report = state
        .report_service
        .create(&caller, payload.report_type, payload.title, payload.content, payload.attachment)
        .await?;

    Ok((StatusCode::CREATED, Json(ReportView::from(report))))
}

pub async fn get_report(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;
    let report = state.report_service.get(&caller, id).await?;
    Ok(Json(ReportView::from(report)))
}

pub async fn update_report(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateReport>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;

    let patch = ReportPatch {
        report_type: payload.report_type,
        title: payload.title,
        content: payload.content,
        attachment: payload.attachment.map(Some),
    };
    let report = state.report_service.update(&caller, id, patch).await?;

    Ok(Json(ReportView::from(report)))
}

/// Moves a report through its lifecycle; publishing stamps `published_at`.
pub async fn set_report_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SetReportStatus>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;
    let report = state.report_service.set_status(&caller, id, payload.status).await?;
    Ok(Json(ReportView::from(report)))
}

pub async fn delete_report(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;
    state.report_service.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
