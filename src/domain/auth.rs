use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id of the authenticated account.
    pub sub: i64,
    /// Expiry as seconds since the Unix epoch.
    pub exp: usize,
}

impl Claims {
    #[must_use]
    pub const fn new(sub: i64, exp: usize) -> Self {
        Self { sub, exp }
    }
}

/// An issued access token together with its expiry.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub expires_at: i64,
}
