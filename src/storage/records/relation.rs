use crate::domain::relation::{ParentStudentRelation, RelationKind};
use crate::error::AppError;
use time::OffsetDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct RelationRecord {
    pub id: i64,
    pub parent_id: i64,
    pub student_id: i64,
    pub kind: String,
    pub is_primary_contact: bool,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<RelationRecord> for ParentStudentRelation {
    type Error = AppError;

    fn try_from(record: RelationRecord) -> Result<Self, Self::Error> {
        let kind = RelationKind::try_from(record.kind.as_str()).map_err(|e| {
            tracing::error!(relation_id = record.id, error = %e, "Unparseable kind in relations row");
            AppError::Internal
        })?;

        Ok(Self {
            id: record.id,
            parent_id: record.parent_id,
            student_id: record.student_id,
            kind,
            is_primary_contact: record.is_primary_contact,
            is_active: record.is_active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}
