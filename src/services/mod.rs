pub mod auth_service;
pub mod dashboard_service;
pub mod directory_service;
pub mod health_service;
pub mod message_service;
pub mod relation_service;
pub mod report_service;
pub mod staff_directory_service;
