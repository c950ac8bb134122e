use crate::domain::directory::{Department, Employee, EmployeeStatus, Position};
use crate::error::AppError;
use time::{Date, OffsetDateTime};

#[derive(sqlx::FromRow)]
pub(crate) struct DepartmentRecord {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<DepartmentRecord> for Department {
    fn from(record: DepartmentRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            is_active: record.is_active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PositionRecord {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<PositionRecord> for Position {
    fn from(record: PositionRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            is_active: record.is_active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct EmployeeRecord {
    pub id: i64,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department_id: i64,
    pub position_id: i64,
    pub is_contact_person: bool,
    pub status: String,
    pub hire_date: Option<Date>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<EmployeeRecord> for Employee {
    type Error = AppError;

    fn try_from(record: EmployeeRecord) -> Result<Self, Self::Error> {
        let status = EmployeeStatus::try_from(record.status.as_str()).map_err(|e| {
            tracing::error!(employee_id = record.id, error = %e, "Unparseable status in employees row");
            AppError::Internal
        })?;

        Ok(Self {
            id: record.id,
            employee_code: record.employee_code,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            phone: record.phone,
            department_id: record.department_id,
            position_id: record.position_id,
            is_contact_person: record.is_contact_person,
            status,
            hire_date: record.hire_date,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}
