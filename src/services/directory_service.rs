use crate::domain::user::{NewUser, Role, User, UserFilter};
use crate::error::{AppError, Result};
use crate::storage::UserStore;
use std::sync::Arc;

/// User directory: the identity and role source consulted by every other
/// component.
#[derive(Clone, Debug)]
pub struct DirectoryService {
    users: Arc<dyn UserStore>,
}

impl DirectoryService {
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Provisions a new account. The password must already be hashed.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` for an empty username and
    /// `AppError::Conflict` if the username is taken.
    #[tracing::instrument(err(level = "warn"), skip(self, new), fields(username = %new.username))]
    pub async fn create_user(&self, new: NewUser) -> Result<User> {
        if new.username.trim().is_empty() {
            return Err(AppError::BadRequest("username must not be empty".to_string()));
        }

        let user = self.users.insert(new).await?;
        tracing::info!(user_id = user.id, role = %user.role, "User provisioned");
        Ok(user)
    }

    /// # Errors
    /// Returns `AppError::NotFound` if no user with that id exists.
    pub async fn get(&self, id: i64) -> Result<User> {
        self.users.find(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.users.find(id).await?.is_some())
    }

    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>> {
        self.users.list(filter).await
    }

    /// Creates the `admin` account at boot when it does not exist yet.
    #[tracing::instrument(err, skip(self, password_hash))]
    pub async fn ensure_admin(&self, password_hash: String) -> Result<()> {
        if self.users.find_by_username("admin").await?.is_some() {
            return Ok(());
        }

        let admin = self
            .users
            .insert(NewUser {
                username: "admin".to_string(),
                password_hash,
                full_name: None,
                role: Role::Admin,
            })
            .await?;
        tracing::info!(user_id = admin.id, "Bootstrap admin account created");
        Ok(())
    }
}
