use crate::domain::directory::{
    Department, Employee, EmployeeFilter, EmployeePatch, EmployeeProfile, EmployeeStatus,
    NewEmployee, Position,
};
use crate::domain::user::{Role, User};
use crate::error::{AppError, Result};
use crate::storage::{DepartmentStore, EmployeeStore, PositionStore};
use std::sync::Arc;

/// Staff directory: departments, positions and employee records. Readable
/// by any signed-in account; mutations are admin operations.
#[derive(Clone, Debug)]
pub struct StaffDirectoryService {
    departments: Arc<dyn DepartmentStore>,
    positions: Arc<dyn PositionStore>,
    employees: Arc<dyn EmployeeStore>,
}

impl StaffDirectoryService {
    #[must_use]
    pub fn new(
        departments: Arc<dyn DepartmentStore>,
        positions: Arc<dyn PositionStore>,
        employees: Arc<dyn EmployeeStore>,
    ) -> Self {
        Self { departments, positions, employees }
    }

    fn require_admin(user: &User) -> Result<()> {
        if user.role == Role::Admin { Ok(()) } else { Err(AppError::Forbidden) }
    }

    #[tracing::instrument(err(level = "warn"), skip(self, caller), fields(user_id = caller.id))]
    pub async fn create_department(&self, caller: &User, name: String) -> Result<Department> {
        Self::require_admin(caller)?;
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("name must not be empty".to_string()));
        }

        let department = self.departments.insert(name).await?;
        tracing::info!(department_id = department.id, "Department created");
        Ok(department)
    }

    pub async fn list_departments(&self) -> Result<Vec<Department>> {
        self.departments.list_active().await
    }

    #[tracing::instrument(err(level = "warn"), skip(self, caller), fields(user_id = caller.id))]
    pub async fn create_position(&self, caller: &User, name: String) -> Result<Position> {
        Self::require_admin(caller)?;
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("name must not be empty".to_string()));
        }

        let position = self.positions.insert(name).await?;
        tracing::info!(position_id = position.id, "Position created");
        Ok(position)
    }

    pub async fn list_positions(&self) -> Result<Vec<Position>> {
        self.positions.list_active().await
    }

    /// Validates referenced department and position before inserting, so a
    /// bad reference surfaces as a 400 instead of a constraint error.
    async fn check_references(&self, department_id: i64, position_id: i64) -> Result<()> {
        if self.departments.find(department_id).await?.is_none() {
            return Err(AppError::BadRequest(format!("unknown department: {department_id}")));
        }
        if self.positions.find(position_id).await?.is_none() {
            return Err(AppError::BadRequest(format!("unknown position: {position_id}")));
        }
        Ok(())
    }

    #[tracing::instrument(err(level = "warn"), skip(self, caller, new), fields(user_id = caller.id, employee_code = %new.employee_code))]
    pub async fn create_employee(&self, caller: &User, new: NewEmployee) -> Result<Employee> {
        Self::require_admin(caller)?;

        for (field, value) in [
            ("employee_code", &new.employee_code),
            ("first_name", &new.first_name),
            ("last_name", &new.last_name),
            ("email", &new.email),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::BadRequest(format!("{field} must not be empty")));
            }
        }
        self.check_references(new.department_id, new.position_id).await?;

        let employee = self.employees.insert(new).await?;
        tracing::info!(employee_id = employee.id, "Employee record created");
        Ok(employee)
    }

    /// # Errors
    /// `NotFound` if the employee does not exist; a dangling department or
    /// position reference is an internal inconsistency.
    pub async fn get_employee(&self, id: i64) -> Result<EmployeeProfile> {
        let employee = self.employees.find(id).await?.ok_or(AppError::NotFound)?;
        self.resolve(employee).await
    }

    /// Active-only lookup by the human-facing employee code, for
    /// integrations that key on the code rather than the row id.
    pub async fn lookup_by_code(&self, employee_code: &str) -> Result<EmployeeProfile> {
        let employee =
            self.employees.find_by_code(employee_code).await?.ok_or(AppError::NotFound)?;
        if employee.status != EmployeeStatus::Active {
            return Err(AppError::NotFound);
        }
        self.resolve(employee).await
    }

    pub async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<EmployeeProfile>> {
        let employees = self.employees.list(filter).await?;
        let mut profiles = Vec::with_capacity(employees.len());
        for employee in employees {
            profiles.push(self.resolve(employee).await?);
        }
        Ok(profiles)
    }

    #[tracing::instrument(err(level = "warn"), skip(self, caller, patch), fields(user_id = caller.id))]
    pub async fn update_employee(
        &self,
        caller: &User,
        id: i64,
        patch: EmployeePatch,
    ) -> Result<EmployeeProfile> {
        Self::require_admin(caller)?;

        if let Some(department_id) = patch.department_id {
            if self.departments.find(department_id).await?.is_none() {
                return Err(AppError::BadRequest(format!("unknown department: {department_id}")));
            }
        }
        if let Some(position_id) = patch.position_id {
            if self.positions.find(position_id).await?.is_none() {
                return Err(AppError::BadRequest(format!("unknown position: {position_id}")));
            }
        }

        let employee = self.employees.update(id, &patch).await?.ok_or(AppError::NotFound)?;
        self.resolve(employee).await
    }

    /// Marks an employee as dismissed. Directory rows are never deleted,
    /// so history stays intact. Idempotent.
    #[tracing::instrument(err(level = "warn"), skip(self, caller), fields(user_id = caller.id))]
    pub async fn dismiss_employee(&self, caller: &User, id: i64) -> Result<EmployeeProfile> {
        Self::require_admin(caller)?;

        let patch = EmployeePatch { status: Some(EmployeeStatus::Dismissed), ..Default::default() };
        let employee = self.employees.update(id, &patch).await?.ok_or(AppError::NotFound)?;
        tracing::info!(employee_id = id, "Employee marked as dismissed");
        self.resolve(employee).await
    }

    async fn resolve(&self, employee: Employee) -> Result<EmployeeProfile> {
        let Some(department) = self.departments.find(employee.department_id).await? else {
            tracing::error!(
                employee_id = employee.id,
                department_id = employee.department_id,
                "Employee references a missing department"
            );
            return Err(AppError::Internal);
        };
        let Some(position) = self.positions.find(employee.position_id).await? else {
            tracing::error!(
                employee_id = employee.id,
                position_id = employee.position_id,
                "Employee references a missing position"
            );
            return Err(AppError::Internal);
        };
        Ok(EmployeeProfile { employee, department, position })
    }
}
