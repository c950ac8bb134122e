use crate::domain::directory::{
    Department, Employee, EmployeeFilter, EmployeePatch, NewEmployee, Position,
};
use crate::domain::message::{Message, NewMessage, ReadFilter};
use crate::domain::relation::{NewRelation, ParentStudentRelation, RelationFilter, RelationPatch};
use crate::domain::report::{NewReport, Report, ReportFilter};
use crate::domain::user::{NewUser, User, UserFilter};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub mod directory_repo;
pub mod memory;
pub mod message_repo;
pub(crate) mod records;
pub mod relation_repo;
pub mod report_repo;
pub mod user_repo;

pub type DbPool = Pool<Postgres>;

/// Initializes the database connection pool.
///
/// # Errors
/// Returns `sqlx::Error` if the connection fails.
pub async fn init_pool(database_url: &str) -> std::result::Result<DbPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(20).connect(database_url).await
}

/// Runs pending schema migrations.
///
/// # Errors
/// Returns `sqlx::migrate::MigrateError` if a migration fails to apply.
pub async fn run_migrations(pool: &DbPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}

/// Persistence contract for the user directory.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Inserts a new account. Fails with `Conflict` if the username is taken.
    async fn insert(&self, new: NewUser) -> Result<User>;
    async fn find(&self, id: i64) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>>;
    async fn count(&self) -> Result<i64>;
}

/// Persistence contract for messages. The only shared mutable resource in
/// the messaging core; every call observes the current persisted state.
#[async_trait]
pub trait MessageStore: Send + Sync + std::fmt::Debug {
    /// Appends one message row. Id and creation timestamp are assigned by
    /// the store, in insertion order.
    async fn insert(&self, new: NewMessage) -> Result<Message>;

    /// Full bidirectional thread between two users, ordered by creation
    /// time ascending with id ascending as tie-break.
    async fn thread_between(&self, user_id: i64, contact_id: i64) -> Result<Vec<Message>>;

    /// Flips every unread message from `sender_id` to `recipient_id` to
    /// read, stamping `read_at`. Idempotent; returns rows affected.
    async fn mark_read(&self, sender_id: i64, recipient_id: i64) -> Result<u64>;

    /// Distinct ids of every user that appears as counterpart of `user_id`,
    /// on either side of a message.
    async fn contact_ids(&self, user_id: i64) -> Result<Vec<i64>>;

    /// Unread messages from `sender_id` to `recipient_id`.
    async fn unread_count(&self, sender_id: i64, recipient_id: i64) -> Result<i64>;

    /// Unread messages addressed to `recipient_id`, all senders.
    async fn total_unread(&self, recipient_id: i64) -> Result<i64>;

    /// Incoming messages for `recipient_id`, newest first.
    async fn received(
        &self,
        recipient_id: i64,
        filter: ReadFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Message>>;

    async fn count_sent(&self, sender_id: i64) -> Result<i64>;
    async fn count(&self) -> Result<i64>;
}

/// Persistence contract for departments. A small lookup dictionary; rows
/// are deactivated, never deleted.
#[async_trait]
pub trait DepartmentStore: Send + Sync + std::fmt::Debug {
    /// Inserts a department. Fails with `Conflict` if the name is taken.
    async fn insert(&self, name: String) -> Result<Department>;
    async fn find(&self, id: i64) -> Result<Option<Department>>;
    /// Active departments ordered by name.
    async fn list_active(&self) -> Result<Vec<Department>>;
}

/// Persistence contract for positions, mirroring [`DepartmentStore`].
#[async_trait]
pub trait PositionStore: Send + Sync + std::fmt::Debug {
    async fn insert(&self, name: String) -> Result<Position>;
    async fn find(&self, id: i64) -> Result<Option<Position>>;
    async fn list_active(&self) -> Result<Vec<Position>>;
}

/// Persistence contract for the staff directory.
#[async_trait]
pub trait EmployeeStore: Send + Sync + std::fmt::Debug {
    /// Inserts a directory entry. Fails with `Conflict` if the employee
    /// code is taken.
    async fn insert(&self, new: NewEmployee) -> Result<Employee>;
    async fn find(&self, id: i64) -> Result<Option<Employee>>;
    async fn find_by_code(&self, employee_code: &str) -> Result<Option<Employee>>;
    /// Filtered listing ordered by department, then surname.
    async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>>;
    async fn update(&self, id: i64, patch: &EmployeePatch) -> Result<Option<Employee>>;
}

/// Persistence contract for parent-student guardianship links.
#[async_trait]
pub trait RelationStore: Send + Sync + std::fmt::Debug {
    /// Inserts a link. Fails with `Conflict` when the (parent, student,
    /// kind) triple already exists.
    async fn insert(&self, new: NewRelation) -> Result<ParentStudentRelation>;
    async fn find(&self, id: i64) -> Result<Option<ParentStudentRelation>>;
    async fn list(&self, filter: &RelationFilter) -> Result<Vec<ParentStudentRelation>>;
    async fn update(&self, id: i64, patch: RelationPatch) -> Result<Option<ParentStudentRelation>>;
    /// Returns false if no row with that id existed.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// Persistence contract for employee reports.
#[async_trait]
pub trait ReportStore: Send + Sync + std::fmt::Debug {
    async fn insert(&self, new: NewReport) -> Result<Report>;
    async fn find(&self, id: i64) -> Result<Option<Report>>;
    async fn list_by_author(&self, author_id: i64, filter: &ReportFilter) -> Result<Vec<Report>>;
    /// Persists the mutable columns of an existing report.
    async fn update(&self, report: &Report) -> Result<()>;
    /// Returns false if no row with that id existed.
    async fn delete(&self, id: i64) -> Result<bool>;
    async fn count_by_author(&self, author_id: i64) -> Result<i64>;
    async fn count(&self) -> Result<i64>;
}
