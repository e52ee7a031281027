use axum::{
    Json,
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, AppState, auth::current_user, pages};
use crate::models::car::CarModelOption;

#[derive(Debug, Deserialize)]
pub struct ModelsQuery {
    #[serde(default)]
    pub make: String,
}

#[derive(Debug, Deserialize)]
pub struct YearsQuery {
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
}

/// GET /
pub async fn home(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    let makes = state.catalog().list_makes().await?;
    let user = current_user(&session).await?;

    Ok(Html(pages::home(
        &makes,
        user.as_ref().map(|u| u.username.as_str()),
    )))
}

/// GET /makes
pub async fn list_makes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.catalog().list_makes().await?))
}

/// GET /models?make=
pub async fn list_models(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModelsQuery>,
) -> Result<Json<Vec<CarModelOption>>, ApiError> {
    Ok(Json(state.catalog().list_models(&query.make).await?))
}

/// GET /years?make=&model=
pub async fn list_years(
    State(state): State<Arc<AppState>>,
    Query(query): Query<YearsQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(
        state
            .catalog()
            .list_years(&query.make, &query.model)
            .await?,
    ))
}
