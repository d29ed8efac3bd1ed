//! Account credentials and bearer sessions.
//!
//! Quill has no server-side session store: a signed token is the session,
//! and it names the account that may edit its own posts.

use uuid::Uuid;

use crate::domain::User;

/// Who a verified token belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
    /// Unix timestamp after which the token is refused.
    pub expires_at: i64,
}

impl SessionClaims {
    /// Claims for a freshly signed-in `user`.
    pub fn for_user(user: &User, expires_at: i64) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            expires_at,
        }
    }
}

/// Signs and checks bearer tokens.
pub trait TokenService: Send + Sync {
    fn issue(&self, user: &User) -> Result<String, AuthError>;

    /// Check signature, issuer and expiry, then read the claims back.
    fn verify(&self, token: &str) -> Result<SessionClaims, AuthError>;

    /// Seconds an issued token stays valid. Reported to clients as `expiresIn`.
    fn lifetime_secs(&self) -> u64;
}

/// One-way password storage.
pub trait PasswordService: Send + Sync {
    fn hash_password(&self, plain: &str) -> Result<String, AuthError>;

    /// `Ok(false)` means the password is wrong. `Err` means the stored hash is unusable.
    fn check_password(&self, plain: &str, stored_hash: &str) -> Result<bool, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown email or wrong password. The two are never told apart.
    #[error("email or password did not match")]
    InvalidCredentials,

    #[error("session token has expired")]
    TokenExpired,

    #[error("session token rejected: {0}")]
    InvalidToken(String),

    #[error("no bearer token supplied")]
    MissingToken,

    #[error("password hashing failed: {0}")]
    Hashing(String),
}
