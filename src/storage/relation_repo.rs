use crate::domain::relation::{NewRelation, ParentStudentRelation, RelationFilter, RelationPatch};
use crate::error::{AppError, Result};
use crate::storage::records::relation::RelationRecord;
use crate::storage::{DbPool, RelationStore};
use async_trait::async_trait;
use sqlx::QueryBuilder;

#[derive(Clone, Debug)]
pub struct RelationRepository {
    pool: DbPool,
}

impl RelationRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const RELATION_COLUMNS: &str = "id, parent_id, student_id, kind, is_primary_contact, \
                                is_active, created_at, updated_at";

#[async_trait]
impl RelationStore for RelationRepository {
    async fn insert(&self, new: NewRelation) -> Result<ParentStudentRelation> {
        let result = sqlx::query_as::<_, RelationRecord>(&format!(
            r"
            INSERT INTO parent_student_relations (parent_id, student_id, kind, is_primary_contact)
            VALUES ($1, $2, $3, $4)
            RETURNING {RELATION_COLUMNS}
            "
        ))
        .bind(new.parent_id)
        .bind(new.student_id)
        .bind(new.kind.as_str())
        .bind(new.is_primary_contact)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(record) => record.try_into(),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
                "this relation already exists for the pair".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn find(&self, id: i64) -> Result<Option<ParentStudentRelation>> {
        let record = sqlx::query_as::<_, RelationRecord>(&format!(
            "SELECT {RELATION_COLUMNS} FROM parent_student_relations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        record.map(TryInto::try_into).transpose()
    }

    async fn list(&self, filter: &RelationFilter) -> Result<Vec<ParentStudentRelation>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {RELATION_COLUMNS} FROM parent_student_relations WHERE TRUE"
        ));

        if let Some(parent_id) = filter.parent_id {
            query.push(" AND parent_id = ").push_bind(parent_id);
        }
        if let Some(student_id) = filter.student_id {
            query.push(" AND student_id = ").push_bind(student_id);
        }
        if let Some(is_active) = filter.is_active {
            query.push(" AND is_active = ").push_bind(is_active);
        }

        query.push(" ORDER BY parent_id, is_primary_contact DESC, id");

        let records: Vec<RelationRecord> = query.build_query_as().fetch_all(&self.pool).await?;
        records.into_iter().map(TryInto::try_into).collect()
    }

    async fn update(&self, id: i64, patch: RelationPatch) -> Result<Option<ParentStudentRelation>> {
        let Some(mut relation) = self.find(id).await? else {
            return Ok(None);
        };

        if let Some(is_primary_contact) = patch.is_primary_contact {
            relation.is_primary_contact = is_primary_contact;
        }
        if let Some(is_active) = patch.is_active {
            relation.is_active = is_active;
        }

        let record = sqlx::query_as::<_, RelationRecord>(&format!(
            r"
            UPDATE parent_student_relations
            SET is_primary_contact = $2, is_active = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {RELATION_COLUMNS}
            "
        ))
        .bind(id)
        .bind(relation.is_primary_contact)
        .bind(relation.is_active)
        .fetch_one(&self.pool)
        .await?;

        record.try_into().map(Some)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM parent_student_relations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
