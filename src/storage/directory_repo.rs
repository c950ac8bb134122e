use crate::domain::directory::{
    Department, Employee, EmployeeFilter, EmployeePatch, NewEmployee, Position,
};
use crate::error::{AppError, Result};
use crate::storage::records::directory::{DepartmentRecord, EmployeeRecord, PositionRecord};
use crate::storage::{DbPool, DepartmentStore, EmployeeStore, PositionStore};
use async_trait::async_trait;
use sqlx::QueryBuilder;

#[derive(Clone, Debug)]
pub struct DepartmentRepository {
    pool: DbPool,
}

impl DepartmentRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartmentStore for DepartmentRepository {
    async fn insert(&self, name: String) -> Result<Department> {
        let result = sqlx::query_as::<_, DepartmentRecord>(
            r"
            INSERT INTO departments (name)
            VALUES ($1)
            RETURNING id, name, is_active, created_at, updated_at
            ",
        )
        .bind(&name)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(record) => Ok(record.into()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::Conflict(format!("department '{name}' already exists")))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find(&self, id: i64) -> Result<Option<Department>> {
        let record = sqlx::query_as::<_, DepartmentRecord>(
            "SELECT id, name, is_active, created_at, updated_at FROM departments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn list_active(&self) -> Result<Vec<Department>> {
        let records = sqlx::query_as::<_, DepartmentRecord>(
            r"
            SELECT id, name, is_active, created_at, updated_at
            FROM departments WHERE is_active = TRUE ORDER BY name
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }
}

#[derive(Clone, Debug)]
pub struct PositionRepository {
    pool: DbPool,
}

impl PositionRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PositionStore for PositionRepository {
    async fn insert(&self, name: String) -> Result<Position> {
        let result = sqlx::query_as::<_, PositionRecord>(
            r"
            INSERT INTO positions (name)
            VALUES ($1)
            RETURNING id, name, is_active, created_at, updated_at
            ",
        )
        .bind(&name)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(record) => Ok(record.into()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::Conflict(format!("position '{name}' already exists")))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find(&self, id: i64) -> Result<Option<Position>> {
        let record = sqlx::query_as::<_, PositionRecord>(
            "SELECT id, name, is_active, created_at, updated_at FROM positions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn list_active(&self) -> Result<Vec<Position>> {
        let records = sqlx::query_as::<_, PositionRecord>(
            r"
            SELECT id, name, is_active, created_at, updated_at
            FROM positions WHERE is_active = TRUE ORDER BY name
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }
}

#[derive(Clone, Debug)]
pub struct EmployeeRepository {
    pool: DbPool,
}

impl EmployeeRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const EMPLOYEE_COLUMNS: &str = "id, employee_code, first_name, last_name, email, phone, \
                                department_id, position_id, is_contact_person, status, \
                                hire_date, created_at, updated_at";

#[async_trait]
impl EmployeeStore for EmployeeRepository {
    async fn insert(&self, new: NewEmployee) -> Result<Employee> {
        let result = sqlx::query_as::<_, EmployeeRecord>(&format!(
            r"
            INSERT INTO employees (employee_code, first_name, last_name, email, phone,
                                   department_id, position_id, is_contact_person, hire_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {EMPLOYEE_COLUMNS}
            "
        ))
        .bind(&new.employee_code)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(new.department_id)
        .bind(new.position_id)
        .bind(new.is_contact_person)
        .bind(new.hire_date)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(record) => record.try_into(),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
                format!("employee code '{}' is already taken", new.employee_code),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn find(&self, id: i64) -> Result<Option<Employee>> {
        let record = sqlx::query_as::<_, EmployeeRecord>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        record.map(TryInto::try_into).transpose()
    }

    async fn find_by_code(&self, employee_code: &str) -> Result<Option<Employee>> {
        let record = sqlx::query_as::<_, EmployeeRecord>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_code = $1"
        ))
        .bind(employee_code)
        .fetch_optional(&self.pool)
        .await?;

        record.map(TryInto::try_into).transpose()
    }

    async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
        let mut query =
            QueryBuilder::new(format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE TRUE"));

        if let Some(department_id) = filter.department_id {
            query.push(" AND department_id = ").push_bind(department_id);
        }
        if let Some(position_id) = filter.position_id {
            query.push(" AND position_id = ").push_bind(position_id);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if filter.contacts_only {
            query.push(" AND is_contact_person = TRUE AND status = 'active'");
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            query
                .push(" AND (last_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR first_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR employee_code ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        query.push(" ORDER BY department_id, last_name, first_name, id");

        let records: Vec<EmployeeRecord> = query.build_query_as().fetch_all(&self.pool).await?;
        records.into_iter().map(TryInto::try_into).collect()
    }

    async fn update(&self, id: i64, patch: &EmployeePatch) -> Result<Option<Employee>> {
        let Some(mut employee) = self.find(id).await? else {
            return Ok(None);
        };

        if let Some(first_name) = &patch.first_name {
            employee.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            employee.last_name = last_name.clone();
        }
        if let Some(email) = &patch.email {
            employee.email = email.clone();
        }
        if let Some(phone) = &patch.phone {
            employee.phone = phone.clone();
        }
        if let Some(department_id) = patch.department_id {
            employee.department_id = department_id;
        }
        if let Some(position_id) = patch.position_id {
            employee.position_id = position_id;
        }
        if let Some(is_contact_person) = patch.is_contact_person {
            employee.is_contact_person = is_contact_person;
        }
        if let Some(status) = patch.status {
            employee.status = status;
        }

        let record = sqlx::query_as::<_, EmployeeRecord>(&format!(
            r"
            UPDATE employees
            SET first_name = $2, last_name = $3, email = $4, phone = $5,
                department_id = $6, position_id = $7, is_contact_person = $8,
                status = $9, updated_at = NOW()
            WHERE id = $1
            RETURNING {EMPLOYEE_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(employee.department_id)
        .bind(employee.position_id)
        .bind(employee.is_contact_person)
        .bind(employee.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        record.try_into().map(Some)
    }
}
