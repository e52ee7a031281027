use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, AppState, pages};
use crate::services::{AuthError, UserSession};

/// Session key holding the serialized [`UserSession`].
const SESSION_USER_KEY: &str = "user";

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /register
pub async fn register_page() -> Html<String> {
    Html(pages::register(None))
}

/// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, ApiError> {
    match state
        .auth()
        .register(&form.email, &form.username, &form.password)
        .await
    {
        Ok(_) => Ok(Redirect::to("/login").into_response()),
        Err(
            e @ (AuthError::DuplicateEmail
            | AuthError::DuplicateUsername
            | AuthError::Validation(_)),
        ) => Ok((
            StatusCode::BAD_REQUEST,
            Html(pages::register(Some(&e.to_string()))),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// GET /login
pub async fn login_page() -> Html<String> {
    Html(pages::login(None))
}

/// POST /login
/// Verifies credentials and stores the identity, admin flag included, in the session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let user = match state.auth().login(&form.username, &form.password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Failed login for {}", form.username);
            return Ok((
                StatusCode::UNAUTHORIZED,
                Html(pages::login(Some("Login failed"))),
            )
                .into_response());
        }
        Err(e) => return Err(e.into()),
    };

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;

    session
        .insert(SESSION_USER_KEY, &user)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    Ok(Redirect::to("/").into_response())
}

/// GET /logout
/// Destroys the session. Safe to call without one.
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = session.flush().await {
        tracing::warn!("Failed to flush session: {e}");
    }
    Redirect::to("/login")
}

// ============================================================================
// Helpers
// ============================================================================

/// Reads the logged-in user from the session, if any.
pub async fn current_user(session: &Session) -> Result<Option<UserSession>, ApiError> {
    let user = session
        .get::<UserSession>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    if let Some(u) = &user {
        tracing::Span::current().record("user_id", u.user_id);
    }

    Ok(user)
}
