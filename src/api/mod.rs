use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

mod assets;
pub mod auth;
mod catalog;
mod error;
mod observability;
pub mod pages;
mod reviews;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<dyn crate::services::AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn crate::services::CatalogService> {
        &self.shared.catalog_service
    }

    #[must_use]
    pub fn reviews(&self) -> &Arc<dyn crate::services::ReviewService> {
        &self.shared.review_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let (secure_cookies, inactivity_minutes) = {
        let server = &state.config().server;
        (server.secure_cookies, server.session_inactivity_minutes)
    };

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            inactivity_minutes,
        )));

    let pages_router = Router::new()
        .route("/", get(catalog::home))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/reviews/{id}", get(reviews::reviews_page))
        .route("/submit-review", post(reviews::submit_review))
        .route("/reviews/{id}/like", post(reviews::like_review))
        .route("/reviews/{id}/dislike", post(reviews::dislike_review))
        .route("/reviews/{id}/delete", post(reviews::delete_review))
        .layer(session_layer);

    Router::new()
        .merge(pages_router)
        .route("/makes", get(catalog::list_makes))
        .route("/models", get(catalog::list_models))
        .route("/years", get(catalog::list_years))
        .route("/health", get(observability::health))
        .route("/metrics", get(observability::get_metrics))
        .route("/assets/{*path}", get(assets::serve_asset))
        .with_state(state)
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(TraceLayer::new_for_http())
}
