use crate::domain::report::{NewReport, Report, ReportFilter};
use crate::error::Result;
use crate::storage::records::report::ReportRecord;
use crate::storage::{DbPool, ReportStore};
use async_trait::async_trait;
use sqlx::QueryBuilder;

#[derive(Clone, Debug)]
pub struct ReportRepository {
    pool: DbPool,
}

impl ReportRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const REPORT_COLUMNS: &str = "id, author_id, report_type, title, content, attachment, status, \
                              created_at, updated_at, published_at";

#[async_trait]
impl ReportStore for ReportRepository {
    async fn insert(&self, new: NewReport) -> Result<Report> {
        let record = sqlx::query_as::<_, ReportRecord>(
            r"
            INSERT INTO reports (author_id, report_type, title, content, attachment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, author_id, report_type, title, content, attachment, status,
                      created_at, updated_at, published_at
            ",
        )
        .bind(new.author_id)
        .bind(new.report_type.as_str())
        .bind(&new.title)
        .bind(&new.content)
        .bind(&new.attachment)
        .fetch_one(&self.pool)
        .await?;

        record.try_into()
    }

    async fn find(&self, id: i64) -> Result<Option<Report>> {
        let record = sqlx::query_as::<_, ReportRecord>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        record.map(TryInto::try_into).transpose()
    }

    async fn list_by_author(&self, author_id: i64, filter: &ReportFilter) -> Result<Vec<Report>> {
        let mut query =
            QueryBuilder::new(format!("SELECT {REPORT_COLUMNS} FROM reports WHERE author_id = "));
        query.push_bind(author_id);

        if let Some(report_type) = filter.report_type {
            query.push(" AND report_type = ").push_bind(report_type.as_str());
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            query
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR content ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        query.push(" ORDER BY created_at DESC, id DESC");

        let records: Vec<ReportRecord> = query.build_query_as().fetch_all(&self.pool).await?;
        records.into_iter().map(TryInto::try_into).collect()
    }

    async fn update(&self, report: &Report) -> Result<()> {
        sqlx::query(
            r"
            UPDATE reports
            SET report_type = $2, title = $3, content = $4, attachment = $5,
                status = $6, published_at = $7, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(report.id)
        .bind(report.report_type.as_str())
        .bind(&report.title)
        .bind(&report.content)
        .bind(&report.attachment)
        .bind(report.status.as_str())
        .bind(report.published_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM reports WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_by_author(&self, author_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reports").fetch_one(&self.pool).await?;
        Ok(count)
    }
}
