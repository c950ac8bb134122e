#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use portal_server::api::{AppState, MgmtState};
use portal_server::config::Config;
use portal_server::services::auth_service::AuthService;
use portal_server::services::dashboard_service::DashboardService;
use portal_server::services::directory_service::DirectoryService;
use portal_server::services::health_service::HealthService;
use portal_server::services::message_service::MessageService;
use portal_server::services::relation_service::RelationService;
use portal_server::services::report_service::ReportService;
use portal_server::services::staff_directory_service::StaffDirectoryService;
use portal_server::storage::{
    DepartmentStore, EmployeeStore, MessageStore, PositionStore, RelationStore, ReportStore,
    UserStore,
    directory_repo::{DepartmentRepository, EmployeeRepository, PositionRepository},
    init_pool, message_repo::MessageRepository, relation_repo::RelationRepository,
    report_repo::ReportRepository, run_migrations, user_repo::UserRepository,
};
use portal_server::telemetry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    telemetry::init_telemetry(&config.telemetry);

    let boot_span = tracing::info_span!("boot_server");
    let (api_listener, mgmt_listener, app, mgmt_app, shutdown_rx) = async {
        let pool = init_pool(&config.database_url).await?;
        run_migrations(&pool).await?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        spawn_signal_handler(shutdown_tx);

        let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(pool.clone()));
        let messages: Arc<dyn MessageStore> = Arc::new(MessageRepository::new(pool.clone()));
        let reports: Arc<dyn ReportStore> = Arc::new(ReportRepository::new(pool.clone()));
        let departments: Arc<dyn DepartmentStore> = Arc::new(DepartmentRepository::new(pool.clone()));
        let positions: Arc<dyn PositionStore> = Arc::new(PositionRepository::new(pool.clone()));
        let employees: Arc<dyn EmployeeStore> = Arc::new(EmployeeRepository::new(pool.clone()));
        let relations: Arc<dyn RelationStore> = Arc::new(RelationRepository::new(pool.clone()));

        let auth_service = AuthService::new(config.auth.clone(), Arc::clone(&users));
        let directory_service = DirectoryService::new(Arc::clone(&users));
        let message_service = MessageService::new(Arc::clone(&users), Arc::clone(&messages));
        let report_service = ReportService::new(Arc::clone(&reports));
        let dashboard_service = DashboardService::new(
            Arc::clone(&users),
            Arc::clone(&messages),
            Arc::clone(&reports),
            message_service.clone(),
        );
        let staff_directory_service =
            StaffDirectoryService::new(departments, positions, employees);
        let relation_service = RelationService::new(relations, Arc::clone(&users));
        let health_service = HealthService::new(pool);

        if let Some(password) = &config.auth.bootstrap_admin_password {
            let password_hash = auth_service.hash_password(password).await?;
            directory_service.ensure_admin(password_hash).await?;
        }

        let state = AppState {
            auth_service,
            directory_service,
            message_service,
            report_service,
            dashboard_service,
            staff_directory_service,
            relation_service,
        };
        let app = portal_server::api::app_router(state);
        let mgmt_app = portal_server::api::mgmt_router(MgmtState { health_service });

        let api_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
        let mgmt_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.mgmt_port).parse()?;

        tracing::info!(address = %api_addr, "listening");
        tracing::info!(address = %mgmt_addr, "management server listening");

        let api_listener = tokio::net::TcpListener::bind(api_addr).await?;
        let mgmt_listener = tokio::net::TcpListener::bind(mgmt_addr).await?;

        Ok::<_, anyhow::Error>((api_listener, mgmt_listener, app, mgmt_app, shutdown_rx))
    }
    .instrument(boot_span)
    .await?;

    let mut api_rx = shutdown_rx.clone();
    let api_server = axum::serve(api_listener, app).with_graceful_shutdown(async move {
        let _ = api_rx.wait_for(|&s| s).await;
    });

    let mut mgmt_rx = shutdown_rx;
    let mgmt_server = axum::serve(mgmt_listener, mgmt_app).with_graceful_shutdown(async move {
        let _ = mgmt_rx.wait_for(|&s| s).await;
    });

    if let Err(e) = tokio::try_join!(api_server, mgmt_server) {
        tracing::error!(error = %e, "Server error");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
}
