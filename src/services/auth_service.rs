//! Domain service for registration, login and session gates.
//!
//! The session identity is a snapshot taken at login. Role checks read the
//! cached `is_admin` flag, so granting or revoking admin only takes effect
//! the next time the user logs in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already in use")]
    DuplicateEmail,

    #[error("Username already taken")]
    DuplicateUsername,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("You must be logged in")]
    NotAuthenticated,

    #[error("Only admins can perform this action")]
    Unauthorized,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Identity stored in the session cookie's server-side record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: i32,
    pub username: String,
    /// Admin flag as it was at login time.
    pub is_admin: bool,
}

/// Passes through the session of a logged-in user.
pub fn require_login(session: Option<&UserSession>) -> Result<&UserSession, AuthError> {
    session.ok_or(AuthError::NotAuthenticated)
}

/// Passes through the session only if it was issued to an admin.
pub fn require_admin(session: Option<&UserSession>) -> Result<&UserSession, AuthError> {
    match session {
        Some(s) if s.is_admin => Ok(s),
        _ => Err(AuthError::Unauthorized),
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a user with a hashed password and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DuplicateEmail`] if the email is already registered.
    async fn register(&self, email: &str, username: &str, password: &str)
    -> Result<i32, AuthError>;

    /// Verifies credentials and returns the session identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<UserSession, AuthError>;

    /// Grants or revokes admin for a user.
    async fn set_admin(&self, username: &str, is_admin: bool) -> Result<(), AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(is_admin: bool) -> UserSession {
        UserSession {
            user_id: 1,
            username: "alice".to_string(),
            is_admin,
        }
    }

    #[test]
    fn require_login_needs_a_session() {
        assert!(matches!(
            require_login(None),
            Err(AuthError::NotAuthenticated)
        ));
        let s = session(false);
        assert_eq!(require_login(Some(&s)).unwrap().user_id, 1);
    }

    #[test]
    fn require_admin_reads_cached_flag() {
        assert!(matches!(require_admin(None), Err(AuthError::Unauthorized)));
        let user = session(false);
        assert!(matches!(
            require_admin(Some(&user)),
            Err(AuthError::Unauthorized)
        ));
        let admin = session(true);
        assert!(require_admin(Some(&admin)).is_ok());
    }
}
