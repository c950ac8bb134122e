use crate::api::schemas::format_timestamp;
use crate::domain::directory::{Department, EmployeeProfile, EmployeeStatus, Position};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

pub(crate) fn parse_date(value: &str) -> Result<Date> {
    Date::parse(value, &DATE_FORMAT)
        .map_err(|_| AppError::BadRequest(format!("invalid date: {value}")))
}

fn format_date(date: Date) -> String {
    date.format(&DATE_FORMAT).unwrap_or_default()
}

#[derive(Debug, Deserialize)]
pub struct CreateNamedEntry {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NamedEntryView {
    pub id: i64,
    pub name: String,
}

impl From<Department> for NamedEntryView {
    fn from(department: Department) -> Self {
        Self { id: department.id, name: department.name }
    }
}

impl From<Position> for NamedEntryView {
    fn from(position: Position) -> Self {
        Self { id: position.id, name: position.name }
    }
}

#[derive(Debug, Serialize)]
pub struct DepartmentListResponse {
    pub departments: Vec<NamedEntryView>,
}

#[derive(Debug, Serialize)]
pub struct PositionListResponse {
    pub positions: Vec<NamedEntryView>,
}

/// All fields optional so a missing field yields our 400, not a 422.
#[derive(Debug, Deserialize)]
pub struct CreateEmployee {
    pub employee_code: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department_id: Option<i64>,
    pub position_id: Option<i64>,
    #[serde(default)]
    pub is_contact_person: bool,
    pub hire_date: Option<String>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdateEmployee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department_id: Option<i64>,
    pub position_id: Option<i64>,
    pub is_contact_person: Option<bool>,
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ListEmployeesParams {
    pub department_id: Option<i64>,
    pub position_id: Option<i64>,
    pub status: Option<EmployeeStatus>,
    #[serde(default)]
    pub contacts_only: bool,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmployeeView {
    pub id: i64,
    pub employee_code: String,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: NamedEntryView,
    pub position: NamedEntryView,
    pub is_contact_person: bool,
    pub status: EmployeeStatus,
    pub hire_date: Option<String>,
    pub created_at: String,
}

impl From<EmployeeProfile> for EmployeeView {
    fn from(profile: EmployeeProfile) -> Self {
        let employee = profile.employee;
        Self {
            id: employee.id,
            full_name: employee.full_name(),
            employee_code: employee.employee_code,
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            phone: employee.phone,
            department: profile.department.into(),
            position: profile.position.into(),
            is_contact_person: employee.is_contact_person,
            status: employee.status,
            hire_date: employee.hire_date.map(format_date),
            created_at: format_timestamp(employee.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EmployeeListResponse {
    pub employees: Vec<EmployeeView>,
}
