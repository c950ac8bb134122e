use crate::api::schemas::format_timestamp;
use crate::domain::relation::{ParentStudentRelation, RelationKind};
use serde::{Deserialize, Serialize};

/// All fields optional so a missing field yields our 400, not a 422.
#[derive(Debug, Deserialize)]
pub struct CreateRelation {
    pub parent_id: Option<i64>,
    pub student_id: Option<i64>,
    pub kind: Option<RelationKind>,
    #[serde(default)]
    pub is_primary_contact: bool,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdateRelation {
    pub is_primary_contact: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListRelationsParams {
    pub parent_id: Option<i64>,
    pub student_id: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RelationView {
    pub id: i64,
    pub parent_id: i64,
    pub student_id: i64,
    pub kind: RelationKind,
    pub is_primary_contact: bool,
    pub is_active: bool,
    pub created_at: String,
}

impl From<ParentStudentRelation> for RelationView {
    fn from(relation: ParentStudentRelation) -> Self {
        Self {
            id: relation.id,
            parent_id: relation.parent_id,
            student_id: relation.student_id,
            kind: relation.kind,
            is_primary_contact: relation.is_primary_contact,
            is_active: relation.is_active,
            created_at: format_timestamp(relation.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RelationListResponse {
    pub relations: Vec<RelationView>,
}
