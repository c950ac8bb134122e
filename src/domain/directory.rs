use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// Organizational unit employees belong to.
#[derive(Debug, Clone)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Job title held by employees.
#[derive(Debug, Clone)]
pub struct Position {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Employment status. Dismissal is a status change, never a row delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    OnLeave,
    Dismissed,
}

impl EmployeeStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnLeave => "on_leave",
            Self::Dismissed => "dismissed",
        }
    }
}

impl TryFrom<&str> for EmployeeStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "on_leave" => Ok(Self::OnLeave),
            "dismissed" => Ok(Self::Dismissed),
            other => Err(format!("unknown employee status: {other}")),
        }
    }
}

/// Staff directory entry. Distinct from a portal account: the directory
/// records people and where they sit, portal accounts record who can log in.
#[derive(Debug, Clone)]
pub struct Employee {
    pub id: i64,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department_id: i64,
    pub position_id: i64,
    pub is_contact_person: bool,
    pub status: EmployeeStatus,
    pub hire_date: Option<Date>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Employee {
    /// Surname-first full name, the directory's display convention.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department_id: i64,
    pub position_id: i64,
    pub is_contact_person: bool,
    pub hire_date: Option<Date>,
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub department_id: Option<i64>,
    pub position_id: Option<i64>,
    pub is_contact_person: Option<bool>,
    pub status: Option<EmployeeStatus>,
}

/// Filters for directory listings.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub department_id: Option<i64>,
    pub position_id: Option<i64>,
    pub status: Option<EmployeeStatus>,
    /// Restrict to active contact persons.
    pub contacts_only: bool,
    /// Case-insensitive substring match against names, email and code.
    pub search: Option<String>,
}

/// An employee with its department and position names resolved.
#[derive(Debug, Clone)]
pub struct EmployeeProfile {
    pub employee: Employee,
    pub department: Department,
    pub position: Position,
}
