use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Kind of guardianship link between a parent account and a student account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Mother,
    Father,
    Guardian,
    Sibling,
    Other,
}

impl RelationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mother => "mother",
            Self::Father => "father",
            Self::Guardian => "guardian",
            Self::Sibling => "sibling",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for RelationKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "mother" => Ok(Self::Mother),
            "father" => Ok(Self::Father),
            "guardian" => Ok(Self::Guardian),
            "sibling" => Ok(Self::Sibling),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown relation kind: {other}")),
        }
    }
}

/// Links a parent account to a student account. At most one relation of a
/// given kind may exist per pair.
#[derive(Debug, Clone)]
pub struct ParentStudentRelation {
    pub id: i64,
    pub parent_id: i64,
    pub student_id: i64,
    pub kind: RelationKind,
    pub is_primary_contact: bool,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewRelation {
    pub parent_id: i64,
    pub student_id: i64,
    pub kind: RelationKind,
    pub is_primary_contact: bool,
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationPatch {
    pub is_primary_contact: Option<bool>,
    pub is_active: Option<bool>,
}

/// Filters for relation listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationFilter {
    pub parent_id: Option<i64>,
    pub student_id: Option<i64>,
    pub is_active: Option<bool>,
}
