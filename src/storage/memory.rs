//! In-memory implementations of the store traits, backing unit and
//! integration tests that exercise service and API behavior without a
//! running database.

use crate::domain::directory::{
    Department, Employee, EmployeeFilter, EmployeePatch, EmployeeStatus, NewEmployee, Position,
};
use crate::domain::message::{Message, NewMessage, ReadFilter};
use crate::domain::relation::{NewRelation, ParentStudentRelation, RelationFilter, RelationPatch};
use crate::domain::report::{NewReport, Report, ReportFilter, ReportStatus};
use crate::domain::user::{NewUser, User, UserFilter};
use crate::error::{AppError, Result};
use crate::storage::{
    DepartmentStore, EmployeeStore, MessageStore, PositionStore, RelationStore, ReportStore,
    UserStore,
};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Mutex;
use time::OffsetDateTime;

fn lock<T>(mutex: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>> {
    mutex.lock().map_err(|_| AppError::Internal)
}

fn matches_search(haystacks: &[&str], search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    needle.is_empty() || haystacks.iter().any(|h| h.to_lowercase().contains(&needle))
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
    next_id: Mutex<i64>,
}

impl InMemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, new: NewUser) -> Result<User> {
        let mut users = lock(&self.users)?;
        if users.iter().any(|u| u.username == new.username) {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                new.username
            )));
        }

        let mut next_id = lock(&self.next_id)?;
        *next_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: *next_id,
            username: new.username,
            password_hash: new.password_hash,
            full_name: new.full_name,
            role: new.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find(&self, id: i64) -> Result<Option<User>> {
        Ok(lock(&self.users)?.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(lock(&self.users)?.iter().find(|u| u.username == username).cloned())
    }

    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let users = lock(&self.users)?;
        let mut out: Vec<User> = users
            .iter()
            .filter(|u| filter.role.is_none_or(|r| u.role == r))
            .filter(|u| filter.is_active.is_none_or(|a| u.is_active == a))
            .filter(|u| {
                filter.search.as_deref().is_none_or(|s| {
                    matches_search(&[&u.username, u.full_name.as_deref().unwrap_or("")], s)
                })
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(out)
    }

    async fn count(&self) -> Result<i64> {
        Ok(lock(&self.users)?.len() as i64)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    messages: Mutex<Vec<Message>>,
    next_id: Mutex<i64>,
}

impl InMemoryMessageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a message with an explicit creation timestamp, so tests can
    /// construct threads with known ordering and timestamp collisions.
    pub fn insert_at(&self, new: NewMessage, created_at: OffsetDateTime) -> Result<Message> {
        let mut messages = lock(&self.messages)?;
        let mut next_id = lock(&self.next_id)?;
        *next_id += 1;
        let message = Message {
            id: *next_id,
            sender_id: new.sender_id,
            recipient_id: new.recipient_id,
            subject: new.subject,
            content: new.content,
            attachment: None,
            is_read: false,
            read_at: None,
            created_at,
            updated_at: created_at,
        };
        messages.push(message.clone());
        Ok(message)
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert(&self, new: NewMessage) -> Result<Message> {
        self.insert_at(new, OffsetDateTime::now_utc())
    }

    async fn thread_between(&self, user_id: i64, contact_id: i64) -> Result<Vec<Message>> {
        let messages = lock(&self.messages)?;
        let mut out: Vec<Message> = messages
            .iter()
            .filter(|m| {
                (m.sender_id == user_id && m.recipient_id == contact_id)
                    || (m.sender_id == contact_id && m.recipient_id == user_id)
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn mark_read(&self, sender_id: i64, recipient_id: i64) -> Result<u64> {
        let mut messages = lock(&self.messages)?;
        let now = OffsetDateTime::now_utc();
        let mut affected = 0;
        for message in messages
            .iter_mut()
            .filter(|m| m.sender_id == sender_id && m.recipient_id == recipient_id && !m.is_read)
        {
            message.is_read = true;
            message.read_at = Some(now);
            message.updated_at = now;
            affected += 1;
        }
        Ok(affected)
    }

    async fn contact_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        let messages = lock(&self.messages)?;
        let mut ids = BTreeSet::new();
        for message in messages.iter() {
            if message.recipient_id == user_id {
                ids.insert(message.sender_id);
            }
            if message.sender_id == user_id {
                ids.insert(message.recipient_id);
            }
        }
        Ok(ids.into_iter().collect())
    }

    async fn unread_count(&self, sender_id: i64, recipient_id: i64) -> Result<i64> {
        let messages = lock(&self.messages)?;
        Ok(messages
            .iter()
            .filter(|m| m.sender_id == sender_id && m.recipient_id == recipient_id && !m.is_read)
            .count() as i64)
    }

    async fn total_unread(&self, recipient_id: i64) -> Result<i64> {
        let messages = lock(&self.messages)?;
        Ok(messages.iter().filter(|m| m.recipient_id == recipient_id && !m.is_read).count() as i64)
    }

    async fn received(
        &self,
        recipient_id: i64,
        filter: ReadFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Message>> {
        let messages = lock(&self.messages)?;
        let mut out: Vec<Message> = messages
            .iter()
            .filter(|m| m.recipient_id == recipient_id)
            .filter(|m| match filter {
                ReadFilter::All => true,
                ReadFilter::Unread => !m.is_read,
                ReadFilter::Read => m.is_read,
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        if let Some(limit) = limit {
            out.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(out)
    }

    async fn count_sent(&self, sender_id: i64) -> Result<i64> {
        let messages = lock(&self.messages)?;
        Ok(messages.iter().filter(|m| m.sender_id == sender_id).count() as i64)
    }

    async fn count(&self) -> Result<i64> {
        Ok(lock(&self.messages)?.len() as i64)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryDepartmentStore {
    departments: Mutex<Vec<Department>>,
    next_id: Mutex<i64>,
}

impl InMemoryDepartmentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DepartmentStore for InMemoryDepartmentStore {
    async fn insert(&self, name: String) -> Result<Department> {
        let mut departments = lock(&self.departments)?;
        if departments.iter().any(|d| d.name == name) {
            return Err(AppError::Conflict(format!("department '{name}' already exists")));
        }

        let mut next_id = lock(&self.next_id)?;
        *next_id += 1;
        let now = OffsetDateTime::now_utc();
        let department =
            Department { id: *next_id, name, is_active: true, created_at: now, updated_at: now };
        departments.push(department.clone());
        Ok(department)
    }

    async fn find(&self, id: i64) -> Result<Option<Department>> {
        Ok(lock(&self.departments)?.iter().find(|d| d.id == id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Department>> {
        let departments = lock(&self.departments)?;
        let mut out: Vec<Department> =
            departments.iter().filter(|d| d.is_active).cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPositionStore {
    positions: Mutex<Vec<Position>>,
    next_id: Mutex<i64>,
}

impl InMemoryPositionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PositionStore for InMemoryPositionStore {
    async fn insert(&self, name: String) -> Result<Position> {
        let mut positions = lock(&self.positions)?;
        if positions.iter().any(|p| p.name == name) {
            return Err(AppError::Conflict(format!("position '{name}' already exists")));
        }

        let mut next_id = lock(&self.next_id)?;
        *next_id += 1;
        let now = OffsetDateTime::now_utc();
        let position =
            Position { id: *next_id, name, is_active: true, created_at: now, updated_at: now };
        positions.push(position.clone());
        Ok(position)
    }

    async fn find(&self, id: i64) -> Result<Option<Position>> {
        Ok(lock(&self.positions)?.iter().find(|p| p.id == id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Position>> {
        let positions = lock(&self.positions)?;
        let mut out: Vec<Position> = positions.iter().filter(|p| p.is_active).cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryEmployeeStore {
    employees: Mutex<Vec<Employee>>,
    next_id: Mutex<i64>,
}

impl InMemoryEmployeeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn insert(&self, new: NewEmployee) -> Result<Employee> {
        let mut employees = lock(&self.employees)?;
        if employees.iter().any(|e| e.employee_code == new.employee_code) {
            return Err(AppError::Conflict(format!(
                "employee code '{}' is already taken",
                new.employee_code
            )));
        }

        let mut next_id = lock(&self.next_id)?;
        *next_id += 1;
        let now = OffsetDateTime::now_utc();
        let employee = Employee {
            id: *next_id,
            employee_code: new.employee_code,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            department_id: new.department_id,
            position_id: new.position_id,
            is_contact_person: new.is_contact_person,
            status: EmployeeStatus::Active,
            hire_date: new.hire_date,
            created_at: now,
            updated_at: now,
        };
        employees.push(employee.clone());
        Ok(employee)
    }

    async fn find(&self, id: i64) -> Result<Option<Employee>> {
        Ok(lock(&self.employees)?.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_code(&self, employee_code: &str) -> Result<Option<Employee>> {
        Ok(lock(&self.employees)?.iter().find(|e| e.employee_code == employee_code).cloned())
    }

    async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
        let employees = lock(&self.employees)?;
        let mut out: Vec<Employee> = employees
            .iter()
            .filter(|e| filter.department_id.is_none_or(|d| e.department_id == d))
            .filter(|e| filter.position_id.is_none_or(|p| e.position_id == p))
            .filter(|e| filter.status.is_none_or(|s| e.status == s))
            .filter(|e| {
                !filter.contacts_only
                    || (e.is_contact_person && e.status == EmployeeStatus::Active)
            })
            .filter(|e| {
                filter.search.as_deref().is_none_or(|s| {
                    matches_search(&[&e.last_name, &e.first_name, &e.email, &e.employee_code], s)
                })
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            a.department_id
                .cmp(&b.department_id)
                .then_with(|| a.last_name.cmp(&b.last_name))
                .then_with(|| a.first_name.cmp(&b.first_name))
                .then(a.id.cmp(&b.id))
        });
        Ok(out)
    }

    async fn update(&self, id: i64, patch: &EmployeePatch) -> Result<Option<Employee>> {
        let mut employees = lock(&self.employees)?;
        let Some(employee) = employees.iter_mut().find(|e| e.id == id) else {
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
        employee.updated_at = OffsetDateTime::now_utc();

        Ok(Some(employee.clone()))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRelationStore {
    relations: Mutex<Vec<ParentStudentRelation>>,
    next_id: Mutex<i64>,
}

impl InMemoryRelationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RelationStore for InMemoryRelationStore {
    async fn insert(&self, new: NewRelation) -> Result<ParentStudentRelation> {
        let mut relations = lock(&self.relations)?;
        if relations.iter().any(|r| {
            r.parent_id == new.parent_id && r.student_id == new.student_id && r.kind == new.kind
        }) {
            return Err(AppError::Conflict("this relation already exists for the pair".to_string()));
        }

        let mut next_id = lock(&self.next_id)?;
        *next_id += 1;
        let now = OffsetDateTime::now_utc();
        let relation = ParentStudentRelation {
            id: *next_id,
            parent_id: new.parent_id,
            student_id: new.student_id,
            kind: new.kind,
            is_primary_contact: new.is_primary_contact,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        relations.push(relation.clone());
        Ok(relation)
    }

    async fn find(&self, id: i64) -> Result<Option<ParentStudentRelation>> {
        Ok(lock(&self.relations)?.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self, filter: &RelationFilter) -> Result<Vec<ParentStudentRelation>> {
        let relations = lock(&self.relations)?;
        let mut out: Vec<ParentStudentRelation> = relations
            .iter()
            .filter(|r| filter.parent_id.is_none_or(|p| r.parent_id == p))
            .filter(|r| filter.student_id.is_none_or(|s| r.student_id == s))
            .filter(|r| filter.is_active.is_none_or(|a| r.is_active == a))
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            a.parent_id
                .cmp(&b.parent_id)
                .then_with(|| b.is_primary_contact.cmp(&a.is_primary_contact))
                .then(a.id.cmp(&b.id))
        });
        Ok(out)
    }

    async fn update(&self, id: i64, patch: RelationPatch) -> Result<Option<ParentStudentRelation>> {
        let mut relations = lock(&self.relations)?;
        let Some(relation) = relations.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        if let Some(is_primary_contact) = patch.is_primary_contact {
            relation.is_primary_contact = is_primary_contact;
        }
        if let Some(is_active) = patch.is_active {
            relation.is_active = is_active;
        }
        relation.updated_at = OffsetDateTime::now_utc();

        Ok(Some(relation.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut relations = lock(&self.relations)?;
        let before = relations.len();
        relations.retain(|r| r.id != id);
        Ok(relations.len() < before)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryReportStore {
    reports: Mutex<Vec<Report>>,
    next_id: Mutex<i64>,
}

impl InMemoryReportStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn insert(&self, new: NewReport) -> Result<Report> {
        let mut reports = lock(&self.reports)?;
        let mut next_id = lock(&self.next_id)?;
        *next_id += 1;
        let now = OffsetDateTime::now_utc();
        let report = Report {
            id: *next_id,
            author_id: new.author_id,
            report_type: new.report_type,
            title: new.title,
            content: new.content,
            attachment: new.attachment,
            status: ReportStatus::Draft,
            created_at: now,
            updated_at: now,
            published_at: None,
        };
        reports.push(report.clone());
        Ok(report)
    }

    async fn find(&self, id: i64) -> Result<Option<Report>> {
        Ok(lock(&self.reports)?.iter().find(|r| r.id == id).cloned())
    }

    async fn list_by_author(&self, author_id: i64, filter: &ReportFilter) -> Result<Vec<Report>> {
        let reports = lock(&self.reports)?;
        let mut out: Vec<Report> = reports
            .iter()
            .filter(|r| r.author_id == author_id)
            .filter(|r| filter.report_type.is_none_or(|t| r.report_type == t))
            .filter(|r| filter.status.is_none_or(|s| r.status == s))
            .filter(|r| {
                filter
                    .search
                    .as_deref()
                    .is_none_or(|s| matches_search(&[&r.title, &r.content], s))
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(out)
    }

    async fn update(&self, report: &Report) -> Result<()> {
        let mut reports = lock(&self.reports)?;
        if let Some(existing) = reports.iter_mut().find(|r| r.id == report.id) {
            *existing = report.clone();
            existing.updated_at = OffsetDateTime::now_utc();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut reports = lock(&self.reports)?;
        let before = reports.len();
        reports.retain(|r| r.id != id);
        Ok(reports.len() < before)
    }

    async fn count_by_author(&self, author_id: i64) -> Result<i64> {
        let reports = lock(&self.reports)?;
        Ok(reports.iter().filter(|r| r.author_id == author_id).count() as i64)
    }

    async fn count(&self) -> Result<i64> {
        Ok(lock(&self.reports)?.len() as i64)
    }
}
