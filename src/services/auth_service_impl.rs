//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::db::repositories::user::DuplicateUser;
use crate::services::auth_service::{AuthError, AuthService, UserSession};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn validate_registration(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        if email.is_empty() || username.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Email, username and password are required".to_string(),
            ));
        }

        if !email.contains('@') {
            return Err(AuthError::Validation(format!(
                "'{email}' is not a valid email address"
            )));
        }

        if password.chars().count() < self.security.min_password_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                self.security.min_password_length
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<i32, AuthError> {
        let email = email.trim();
        let username = username.trim();
        self.validate_registration(email, username, password)?;

        if self.store.get_user_by_email(email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        if self.store.get_user_by_username(username).await?.is_some() {
            return Err(AuthError::DuplicateUsername);
        }

        // The lookups above can race another registration; the unique
        // indexes have the final say.
        let id = match self
            .store
            .create_user(email, username, password, &self.security)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                let duplicate = e.downcast_ref::<DuplicateUser>().copied();
                return Err(match duplicate {
                    Some(DuplicateUser::Email) => AuthError::DuplicateEmail,
                    Some(DuplicateUser::Username) => AuthError::DuplicateUsername,
                    None => e.into(),
                });
            }
        };

        info!(user_id = id, "Registered user {username}");
        Ok(id)
    }

    async fn login(&self, username: &str, password: &str) -> Result<UserSession, AuthError> {
        let user = self
            .store
            .verify_user_password(username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if user.is_admin {
            info!("Admin logged in: {}", user.username);
        }

        Ok(UserSession {
            user_id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        })
    }

    async fn set_admin(&self, username: &str, is_admin: bool) -> Result<(), AuthError> {
        if !self.store.set_user_admin(username, is_admin).await? {
            return Err(AuthError::UserNotFound(username.to_string()));
        }

        info!("Admin flag for {username} set to {is_admin}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_store;

    fn fast_security() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        }
    }

    #[tokio::test]
    async fn register_then_login_returns_non_admin_session() {
        let store = temp_store().await;
        let auth = SeaOrmAuthService::new(store, fast_security());

        let id = auth.register("a@x.com", "alice", "pw123").await.unwrap();
        let session = auth.login("alice", "pw123").await.unwrap();

        assert_eq!(session.user_id, id);
        assert_eq!(session.username, "alice");
        assert!(!session.is_admin);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_new_row() {
        let store = temp_store().await;
        let auth = SeaOrmAuthService::new(store.clone(), fast_security());

        auth.register("a@x.com", "alice", "pw123").await.unwrap();
        let err = auth.register("a@x.com", "bob", "pw456").await.unwrap_err();

        assert!(matches!(err, AuthError::DuplicateEmail));
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_registrations_with_one_email_yield_one_account() {
        let store = temp_store().await;
        let auth = std::sync::Arc::new(SeaOrmAuthService::new(store.clone(), fast_security()));

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let auth = auth.clone();
                tokio::spawn(async move { auth.register("a@x.com", &format!("user{i}"), "pw").await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AuthError::DuplicateEmail) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = temp_store().await;
        let auth = SeaOrmAuthService::new(store, fast_security());

        auth.register("a@x.com", "alice", "pw123").await.unwrap();
        let err = auth
            .register("other@x.com", "alice", "pw123")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::DuplicateUsername));
    }

    #[tokio::test]
    async fn login_rejects_unknown_user_and_wrong_password() {
        let store = temp_store().await;
        let auth = SeaOrmAuthService::new(store, fast_security());
        auth.register("a@x.com", "alice", "pw123").await.unwrap();

        assert!(matches!(
            auth.login("alice", "nope").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("mallory", "pw123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn admin_flag_is_snapshotted_at_login() {
        let store = temp_store().await;
        let auth = SeaOrmAuthService::new(store, fast_security());
        auth.register("a@x.com", "alice", "pw123").await.unwrap();

        let before = auth.login("alice", "pw123").await.unwrap();
        auth.set_admin("alice", true).await.unwrap();

        assert!(!before.is_admin);
        assert!(auth.login("alice", "pw123").await.unwrap().is_admin);
    }

    #[tokio::test]
    async fn set_admin_on_unknown_user_fails() {
        let store = temp_store().await;
        let auth = SeaOrmAuthService::new(store, fast_security());

        assert!(matches!(
            auth.set_admin("ghost", true).await,
            Err(AuthError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn register_validates_input() {
        let store = temp_store().await;
        let auth = SeaOrmAuthService::new(store, fast_security());

        assert!(matches!(
            auth.register("", "alice", "pw").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            auth.register("not-an-email", "alice", "pw").await,
            Err(AuthError::Validation(_))
        ));
    }
}
