use crate::domain::user::{Role, User};
use crate::error::AppError;
use time::OffsetDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<UserRecord> for User {
    type Error = AppError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let role = Role::try_from(record.role.as_str()).map_err(|e| {
            tracing::error!(user_id = record.id, error = %e, "Unparseable role in users row");
            AppError::Internal
        })?;

        Ok(Self {
            id: record.id,
            username: record.username,
            password_hash: record.password_hash,
            full_name: record.full_name,
            role,
            is_active: record.is_active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}
