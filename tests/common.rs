use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use portal_server::api::{AppState, app_router};
use portal_server::config::AuthConfig;
use portal_server::domain::user::{NewUser, Role, User};
use portal_server::services::auth_service::AuthService;
use portal_server::services::dashboard_service::DashboardService;
use portal_server::services::directory_service::DirectoryService;
use portal_server::services::message_service::MessageService;
use portal_server::services::relation_service::RelationService;
use portal_server::services::report_service::ReportService;
use portal_server::services::staff_directory_service::StaffDirectoryService;
use portal_server::storage::memory::{
    InMemoryDepartmentStore, InMemoryEmployeeStore, InMemoryMessageStore, InMemoryPositionStore,
    InMemoryRelationStore, InMemoryReportStore, InMemoryUserStore,
};
use portal_server::storage::{
    DepartmentStore, EmployeeStore, MessageStore, PositionStore, RelationStore, ReportStore,
    UserStore,
};
use std::sync::Arc;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub auth_service: AuthService,
    pub directory_service: DirectoryService,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserStore::new());
        let messages = Arc::new(InMemoryMessageStore::new());
        let reports = Arc::new(InMemoryReportStore::new());

        let user_store: Arc<dyn UserStore> = Arc::clone(&users) as Arc<dyn UserStore>;
        let message_store: Arc<dyn MessageStore> = Arc::clone(&messages) as Arc<dyn MessageStore>;
        let report_store: Arc<dyn ReportStore> = Arc::clone(&reports) as Arc<dyn ReportStore>;
        let department_store: Arc<dyn DepartmentStore> = Arc::new(InMemoryDepartmentStore::new());
        let position_store: Arc<dyn PositionStore> = Arc::new(InMemoryPositionStore::new());
        let employee_store: Arc<dyn EmployeeStore> = Arc::new(InMemoryEmployeeStore::new());
        let relation_store: Arc<dyn RelationStore> = Arc::new(InMemoryRelationStore::new());

        let auth_config = AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            access_token_ttl_secs: 900,
            bootstrap_admin_password: None,
        };

        let auth_service = AuthService::new(auth_config, Arc::clone(&user_store));
        let directory_service = DirectoryService::new(Arc::clone(&user_store));
        let message_service = MessageService::new(Arc::clone(&user_store), Arc::clone(&message_store));
        let report_service = ReportService::new(Arc::clone(&report_store));
        let dashboard_service = DashboardService::new(
            Arc::clone(&user_store),
            Arc::clone(&message_store),
            Arc::clone(&report_store),
            message_service.clone(),
        );
        let staff_directory_service =
            StaffDirectoryService::new(department_store, position_store, employee_store);
        let relation_service = RelationService::new(relation_store, Arc::clone(&user_store));

        let state = AppState {
            auth_service: auth_service.clone(),
            directory_service: directory_service.clone(),
            message_service: message_service.clone(),
            report_service,
            dashboard_service,
            staff_directory_service,
            relation_service,
        };

        Self { router: app_router(state), auth_service, directory_service }
    }

    pub async fn create_user(&self, username: &str, full_name: Option<&str>, role: Role) -> User {
        let password_hash =
            self.auth_service.hash_password("correct horse battery staple").await.unwrap();
        self.directory_service
            .create_user(NewUser {
                username: username.to_string(),
                password_hash,
                full_name: full_name.map(String::from),
                role,
            })
            .await
            .unwrap()
    }

    pub fn token_for(&self, user: &User) -> String {
        self.auth_service.issue_session(user.id).unwrap().token
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(
        &self,
        path: &str,
        token: Option<&str>,
        body: &serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    pub async fn put_json(
        &self,
        path: &str,
        token: Option<&str>,
        body: &serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder()
            .method("PUT")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method("DELETE").uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }
}
