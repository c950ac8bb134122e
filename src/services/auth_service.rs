use crate::config::AuthConfig;
use crate::domain::auth::{AuthSession, Claims};
use crate::error::{AppError, Result};
use crate::storage::UserStore;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::rngs::OsRng;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug)]
pub struct AuthService {
    config: AuthConfig,
    users: Arc<dyn UserStore>,
}

impl AuthService {
    #[must_use]
    pub fn new(config: AuthConfig, users: Arc<dyn UserStore>) -> Self {
        Self { config, users }
    }

    /// Authenticates a user by username and password and issues an access
    /// token. Deactivated accounts cannot log in.
    #[tracing::instrument(
        skip(self, username, password),
        fields(user_id = tracing::field::Empty),
        err(level = "warn")
    )]
    pub async fn login(&self, username: String, password: String) -> Result<AuthSession> {
        let user = match self.users.find_by_username(&username).await? {
            Some(u) => u,
            None => {
                tracing::warn!("Login failed: user not found");
                return Err(AppError::AuthError);
            }
        };

        tracing::Span::current().record("user_id", tracing::field::display(user.id));

        if !user.is_active {
            tracing::warn!("Login failed: account deactivated");
            return Err(AppError::AuthError);
        }

        if !self.verify_password(&password, &user.password_hash).await? {
            tracing::warn!("Login failed: invalid password");
            return Err(AppError::AuthError);
        }

        self.issue_session(user.id)
    }

    /// Hashes a password on a blocking thread.
    ///
    /// # Errors
    /// Returns `AppError::Internal` if hashing fails.
    #[tracing::instrument(err, skip(self, password))]
    pub async fn hash_password(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map_err(|_| AppError::Internal)
                .map(|h| h.to_string())
        })
        .await
        .map_err(|_| AppError::Internal)?
    }

    #[tracing::instrument(err, skip(self, password, password_hash))]
    pub async fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool> {
        let password = password.to_string();
        let password_hash = password_hash.to_string();
        tokio::task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash).map_err(|_| AppError::Internal)?;
            Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
        })
        .await
        .map_err(|_| AppError::Internal)?
    }

    /// Issues a signed access token for the given user id.
    ///
    /// # Errors
    /// Returns `AppError::Internal` if signing fails.
    pub fn issue_session(&self, user_id: i64) -> Result<AuthSession> {
        let exp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(std::time::Duration::from_secs(0))
            .as_secs() as usize
            + self.config.access_token_ttl_secs as usize;

        let claims = Claims::new(user_id, exp);
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|_| AppError::Internal)?;

        Ok(AuthSession { token, expires_at: exp as i64 })
    }

    /// Verifies an access token and returns the user id (subject).
    ///
    /// # Errors
    /// Returns `AppError::AuthError` if the token is invalid or expired.
    pub fn verify_token(&self, token: &str) -> Result<i64> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::AuthError)?;

        Ok(token_data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{NewUser, Role};
    use crate::storage::memory::InMemoryUserStore;

    fn setup_service() -> AuthService {
        let config = AuthConfig {
            jwt_secret: "test_secret".to_string(),
            access_token_ttl_secs: 3600,
            bootstrap_admin_password: None,
        };
        AuthService::new(config, Arc::new(InMemoryUserStore::new()))
    }

    #[tokio::test]
    async fn test_jwt_roundtrip() {
        let service = setup_service();
        let session = service.issue_session(42).unwrap();
        assert_eq!(service.verify_token(&session.token).unwrap(), 42);
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let service = setup_service();
        assert!(matches!(service.verify_token("not-a-jwt"), Err(AppError::AuthError)));
    }

    #[tokio::test]
    async fn test_password_hashing() {
        let service = setup_service();
        let password = "password12345";
        let hash = service.hash_password(password).await.unwrap();

        assert!(service.verify_password(password, &hash).await.unwrap());
        assert!(!service.verify_password("wrong_password", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_login_flow() {
        let users = Arc::new(InMemoryUserStore::new());
        let config = AuthConfig {
            jwt_secret: "test_secret".to_string(),
            access_token_ttl_secs: 3600,
            bootstrap_admin_password: None,
        };
        let service = AuthService::new(config, Arc::clone(&users) as Arc<dyn UserStore>);

        let hash = service.hash_password("hunter2222").await.unwrap();
        let user = users
            .insert(NewUser {
                username: "pvasileva".to_string(),
                password_hash: hash,
                full_name: Some("Polina Vasileva".to_string()),
                role: Role::Parent,
            })
            .await
            .unwrap();

        let session =
            service.login("pvasileva".to_string(), "hunter2222".to_string()).await.unwrap();
        assert_eq!(service.verify_token(&session.token).unwrap(), user.id);

        let err = service.login("pvasileva".to_string(), "wrong".to_string()).await;
        assert!(matches!(err, Err(AppError::AuthError)));

        let err = service.login("ghost".to_string(), "hunter2222".to_string()).await;
        assert!(matches!(err, Err(AppError::AuthError)));
    }
}
