use crate::domain::report::{
    NewReport, Report, ReportFilter, ReportPatch, ReportStatus, ReportType,
};
use crate::domain::user::{Role, User};
use crate::error::{AppError, Result};
use crate::storage::ReportStore;
use std::sync::Arc;
use time::OffsetDateTime;

/// Employee-authored student reports with a draft/published/archived
/// lifecycle. Authoring is restricted to employees; admins may read and
/// delete any report.
#[derive(Clone, Debug)]
pub struct ReportService {
    reports: Arc<dyn ReportStore>,
}

impl ReportService {
    #[must_use]
    pub fn new(reports: Arc<dyn ReportStore>) -> Self {
        Self { reports }
    }

    fn require_employee(user: &User) -> Result<()> {
        if user.role == Role::Employee { Ok(()) } else { Err(AppError::Forbidden) }
    }

    #[tracing::instrument(err(level = "warn"), skip(self, author, title, content), fields(author_id = author.id))]
    pub async fn create(
        &self,
        author: &User,
        report_type: ReportType,
        title: String,
        content: String,
        attachment: Option<String>,
    ) -> Result<Report> {
        Self::require_employee(author)?;

        if title.trim().is_empty() {
            return Err(AppError::BadRequest("title must not be empty".to_string()));
        }
        if content.trim().is_empty() {
            return Err(AppError::BadRequest("content must not be empty".to_string()));
        }

        let report = self
            .reports
            .insert(NewReport { author_id: author.id, report_type, title, content, attachment })
            .await?;
        tracing::info!(report_id = report.id, "Report created");
        Ok(report)
    }

    /// Reports authored by the caller, newest first.
    pub async fn list(&self, author: &User, filter: &ReportFilter) -> Result<Vec<Report>> {
        Self::require_employee(author)?;
        self.reports.list_by_author(author.id, filter).await
    }

    /// # Errors
    /// `NotFound` if the report does not exist; `Forbidden` when the caller
    /// is neither the author nor an admin.
    pub async fn get(&self, user: &User, id: i64) -> Result<Report> {
        let report = self.reports.find(id).await?.ok_or(AppError::NotFound)?;
        if report.author_id != user.id && user.role != Role::Admin {
            return Err(AppError::Forbidden);
        }
        Ok(report)
    }

    /// Applies a partial update. Author only.
    #[tracing::instrument(err(level = "warn"), skip(self, user, patch), fields(user_id = user.id))]
    pub async fn update(&self, user: &User, id: i64, patch: ReportPatch) -> Result<Report> {
        Self::require_employee(user)?;
        let mut report = self.reports.find(id).await?.ok_or(AppError::NotFound)?;
        if report.author_id != user.id {
            return Err(AppError::Forbidden);
        }

        if let Some(report_type) = patch.report_type {
            report.report_type = report_type;
        }
        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(AppError::BadRequest("title must not be empty".to_string()));
            }
            report.title = title;
        }
        if let Some(content) = patch.content {
            if content.trim().is_empty() {
                return Err(AppError::BadRequest("content must not be empty".to_string()));
            }
            report.content = content;
        }
        if let Some(attachment) = patch.attachment {
            report.attachment = attachment;
        }

        self.reports.update(&report).await?;
        Ok(report)
    }

    /// Moves a report to a new status. Publishing stamps `published_at`
    /// the first time only.
    #[tracing::instrument(err(level = "warn"), skip(self, user), fields(user_id = user.id))]
    pub async fn set_status(&self, user: &User, id: i64, status: ReportStatus) -> Result<Report> {
        Self::require_employee(user)?;
        let mut report = self.reports.find(id).await?.ok_or(AppError::NotFound)?;
        if report.author_id != user.id {
            return Err(AppError::Forbidden);
        }

        report.status = status;
        if status == ReportStatus::Published && report.published_at.is_none() {
            report.published_at = Some(OffsetDateTime::now_utc());
        }

        self.reports.update(&report).await?;
        tracing::info!(report_id = report.id, status = %status.as_str(), "Report status changed");
        Ok(report)
    }

    /// Deletes a report. Author or admin.
    #[tracing::instrument(err(level = "warn"), skip(self, user), fields(user_id = user.id))]
    pub async fn delete(&self, user: &User, id: i64) -> Result<()> {
        let report = self.reports.find(id).await?.ok_or(AppError::NotFound)?;
        if report.author_id != user.id && user.role != Role::Admin {
            return Err(AppError::Forbidden);
        }

        self.reports.delete(id).await?;
        tracing::info!(report_id = id, "Report deleted");
        Ok(())
    }
}
