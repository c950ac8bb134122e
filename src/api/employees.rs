use crate::api::AppState;
use crate::api::middleware::AuthUser;
use crate::api::schemas::directory::{
    CreateEmployee, CreateNamedEntry, DepartmentListResponse, EmployeeListResponse, EmployeeView,
    ListEmployeesParams, LookupParams, NamedEntryView, PositionListResponse, UpdateEmployee,
    parse_date,
};
use crate::domain::directory::{EmployeeFilter, EmployeePatch, NewEmployee};
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| AppError::BadRequest(format!("{field} is required")))
}

pub async fn list_departments(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    state.current_user(&auth_user).await?;
    let departments = state.staff_directory_service.list_departments().await?;
    Ok(Json(DepartmentListResponse {
        departments: departments.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_department(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateNamedEntry>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;
    let name = required(payload.name, "name")?;
    let department = state.staff_directory_service.create_department(&caller, name).await?;
    Ok((StatusCode::CREATED, Json(NamedEntryView::from(department))))
}

pub async fn list_positions(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    state.current_user(&auth_user).await?;
    let positions = state.staff_directory_service.list_positions().await?;
    Ok(Json(PositionListResponse { positions: positions.into_iter().map(Into::into).collect() }))
}

pub async fn create_position(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateNamedEntry>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;
    let name = required(payload.name, "name")?;
    let position = state.staff_directory_service.create_position(&caller, name).await?;
    Ok((StatusCode::CREATED, Json(NamedEntryView::from(position))))
}

/// Ordered by department, then surname.
pub async fn list_employees(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListEmployeesParams>,
) -> Result<impl IntoResponse> {
    state.current_user(&auth_user).await?;

    let filter = EmployeeFilter {
        department_id: params.department_id,
        position_id: params.position_id,
        status: params.status,
        contacts_only: params.contacts_only,
        search: params.search,
    };
    let employees = state.staff_directory_service.list_employees(&filter).await?;

    Ok(Json(EmployeeListResponse { employees: employees.into_iter().map(Into::into).collect() }))
}

pub async fn create_employee(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateEmployee>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;

    let hire_date = payload.hire_date.as_deref().map(parse_date).transpose()?;
    let new = NewEmployee {
        employee_code: required(payload.employee_code, "employee_code")?,
        first_name: required(payload.first_name, "first_name")?,
        last_name: required(payload.last_name, "last_name")?,
        email: required(payload.email, "email")?,
        phone: payload.phone,
        department_id: required(payload.department_id, "department_id")?,
        position_id: required(payload.position_id, "position_id")?,
        is_contact_person: payload.is_contact_person,
        hire_date,
    };

    let employee = state.staff_directory_service.create_employee(&caller, new).await?;
    let profile = state.staff_directory_service.get_employee(employee.id).await?;
    Ok((StatusCode::CREATED, Json(EmployeeView::from(profile))))
}

/// Resolves an active employee by the human-facing code.
pub async fn lookup_employee(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<impl IntoResponse> {
    state.current_user(&auth_user).await?;

    let code = params
        .code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("code is required".to_string()))?;
    let profile = state.staff_directory_service.lookup_by_code(code).await?;

    Ok(Json(EmployeeView::from(profile)))
}

pub async fn get_employee(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.current_user(&auth_user).await?;
    let profile = state.staff_directory_service.get_employee(id).await?;
    Ok(Json(EmployeeView::from(profile)))
}

pub async fn update_employee(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateEmployee>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;

    let patch = EmployeePatch {
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        phone: payload.phone.map(Some),
        department_id: payload.department_id,
        position_id: payload.position_id,
        is_contact_person: payload.is_contact_person,
        status: payload.status,
    };
    let profile = state.staff_directory_service.update_employee(&caller, id, patch).await?;

    Ok(Json(EmployeeView::from(profile)))
}

/// Soft delete: the row stays, the status flips to dismissed.
pub async fn dismiss_employee(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let caller = state.current_user(&auth_user).await?;
    let profile = state.staff_directory_service.dismiss_employee(&caller, id).await?;
    Ok(Json(EmployeeView::from(profile)))
}
