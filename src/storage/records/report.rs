use crate::domain::report::{Report, ReportStatus, ReportType};
use crate::error::AppError;
use time::OffsetDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct ReportRecord {
    pub id: i64,
    pub author_id: i64,
    pub report_type: String,
    pub title: String,
    pub content: String,
    pub attachment: Option<String>,
    pub status: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub published_at: Option<OffsetDateTime>,
}

impl TryFrom<ReportRecord> for Report {
    type Error = AppError;

    fn try_from(record: ReportRecord) -> Result<Self, Self::Error> {
        let report_type = ReportType::try_from(record.report_type.as_str()).map_err(|e| {
            tracing::error!(report_id = record.id, error = %e, "Unparseable type in reports row");
            AppError::Internal
        })?;
        let status = ReportStatus::try_from(record.status.as_str()).map_err(|e| {
            tracing::error!(report_id = record.id, error = %e, "Unparseable status in reports row");
            AppError::Internal
        })?;

        Ok(Self {
            id: record.id,
            author_id: record.author_id,
            report_type,
            title: record.title,
            content: record.content,
            attachment: record.attachment,
            status,
            created_at: record.created_at,
            updated_at: record.updated_at,
            published_at: record.published_at,
        })
    }
}
