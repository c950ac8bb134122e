use crate::api::schemas::format_timestamp;
use crate::domain::report::{Report, ReportStatus, ReportType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateReport {
    pub report_type: ReportType,
    pub title: String,
    pub content: String,
    pub attachment: Option<String>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdateReport {
    pub report_type: Option<ReportType>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub attachment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetReportStatus {
    pub status: ReportStatus,
}

#[derive(Debug, Deserialize)]
pub struct ListReportsParams {
    pub report_type: Option<ReportType>,
    pub status: Option<ReportStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportView {
    pub id: i64,
    pub author_id: i64,
    pub report_type: ReportType,
    pub title: String,
    pub content: String,
    pub attachment: Option<String>,
    pub status: ReportStatus,
    pub created_at: String,
    pub updated_at: String,
    pub published_at: Option<String>,
}

impl From<Report> for ReportView {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            author_id: report.author_id,
            report_type: report.report_type,
            title: report.title,
            content: report.content,
            attachment: report.attachment,
            status: report.status,
            created_at: format_timestamp(report.created_at),
            updated_at: format_timestamp(report.updated_at),
            published_at: report.published_at.map(format_timestamp),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportListResponse {
    pub reports: Vec<ReportView>,
}
