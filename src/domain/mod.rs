pub mod auth;
pub mod dashboard;
pub mod directory;
pub mod message;
pub mod relation;
pub mod report;
pub mod user;
