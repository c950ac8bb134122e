use crate::api::middleware::AuthUser;
use crate::domain::user::User;
use crate::error::{AppError, Result};
use crate::services::auth_service::AuthService;
use crate::services::dashboard_service::DashboardService;
use crate::services::directory_service::DirectoryService;
use crate::services::health_service::HealthService;
use crate::services::message_service::MessageService;
use crate::services::relation_service::RelationService;
use crate::services::report_service::ReportService;
use crate::services::staff_directory_service::StaffDirectoryService;
use axum::body::Body;
use axum::http::Request;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod health;
pub mod messages;
pub mod middleware;
pub mod relations;
pub mod reports;
pub mod schemas;
pub mod users;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth_service: AuthService,
    pub directory_service: DirectoryService,
    pub message_service: MessageService,
    pub report_service: ReportService,
    pub dashboard_service: DashboardService,
    pub staff_directory_service: StaffDirectoryService,
    pub relation_service: RelationService,
}

impl AppState {
    /// Resolves the authenticated caller to a full user record.
    ///
    /// A valid token for a deleted account is still an authentication
    /// failure, not a missing resource.
    pub async fn current_user(&self, auth_user: &AuthUser) -> Result<User> {
        match self.directory_service.get(auth_user.user_id).await {
            Ok(user) => Ok(user),
            Err(AppError::NotFound) => Err(AppError::AuthError),
            Err(e) => Err(e),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MgmtState {
    pub health_service: HealthService,
}

/// Configures and returns the primary application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/sessions", post(auth::login))
        .route("/v1/users", get(users::list_users).post(users::create_user))
        .route("/v1/users/{id}", get(users::get_user))
        .route("/v1/reports", get(reports::list_reports).post(reports::create_report))
        .route(
            "/v1/reports/{id}",
            get(reports::get_report).put(reports::update_report).delete(reports::delete_report),
        )
        .route("/v1/reports/{id}/status", post(reports::set_report_status))
        .route(
            "/v1/departments",
            get(employees::list_departments).post(employees::create_department),
        )
        .route("/v1/positions", get(employees::list_positions).post(employees::create_position))
        .route("/v1/employees", get(employees::list_employees).post(employees::create_employee))
        .route("/v1/employees/lookup", get(employees::lookup_employee))
        .route(
            "/v1/employees/{id}",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::dismiss_employee),
        )
        .route("/v1/relations", get(relations::list_relations).post(relations::create_relation))
        .route(
            "/v1/relations/{id}",
            get(relations::get_relation)
                .put(relations::update_relation)
                .delete(relations::delete_relation),
        )
        .route("/api/contacts", get(messages::contacts))
        .route("/api/messages", get(messages::conversation))
        .route("/api/messages/send", post(messages::send_message))
        .route("/api/inbox", get(messages::inbox))
        .route("/api/dashboard", get(dashboard::dashboard))
        .layer(PropagateRequestIdLayer::new(axum::http::HeaderName::from_static("x-request-id")))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(move |request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "user_id" = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
                        let status = response.status();
                        tracing::Span::current().record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(
            axum::http::HeaderName::from_static("x-request-id"),
            middleware::MakeRequestUuidOrHeader,
        ))
        .with_state(state)
}

pub fn mgmt_router(state: MgmtState) -> Router {
    Router::new().route("/livez", get(health::livez)).route("/readyz", get(health::readyz)).with_state(state)
}
