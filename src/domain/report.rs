use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Progress,
    Behavior,
    Absence,
    Discipline,
    Achievement,
    Other,
}

impl ReportType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Progress => "progress",
            Self::Behavior => "behavior",
            Self::Absence => "absence",
            Self::Discipline => "discipline",
            Self::Achievement => "achievement",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for ReportType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "progress" => Ok(Self::Progress),
            "behavior" => Ok(Self::Behavior),
            "absence" => Ok(Self::Absence),
            "discipline" => Ok(Self::Discipline),
            "achievement" => Ok(Self::Achievement),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown report type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Draft,
    Published,
    Archived,
}

impl ReportStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl TryFrom<&str> for ReportStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            other => Err(format!("unknown report status: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub id: i64,
    pub author_id: i64,
    pub report_type: ReportType,
    pub title: String,
    pub content: String,
    pub attachment: Option<String>,
    pub status: ReportStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewReport {
    pub author_id: i64,
    pub report_type: ReportType,
    pub title: String,
    pub content: String,
    pub attachment: Option<String>,
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ReportPatch {
    pub report_type: Option<ReportType>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub attachment: Option<Option<String>>,
}

/// Filters for report listings.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub report_type: Option<ReportType>,
    pub status: Option<ReportStatus>,
    /// Case-insensitive substring match against title and content.
    pub search: Option<String>,
}
