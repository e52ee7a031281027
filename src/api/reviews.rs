use axum::{
    Form,
    extract::{Path, Query, State},
    http::{HeaderMap, header},
    response::{Html, Redirect},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, AppState, auth::current_user, pages, validation};
use crate::models::review::ReviewSort;
use crate::services::{ReviewSubmission, require_login};

#[derive(Debug, Deserialize)]
pub struct ReviewsQuery {
    pub sort: Option<String>,
}

/// Form fields are taken as text so a malformed value is a 400, not a rejection.
#[derive(Debug, Deserialize)]
pub struct SubmitReviewForm {
    #[serde(default)]
    pub car_id: String,
    #[serde(default)]
    pub review_title: String,
    #[serde(default)]
    pub review_body: String,
    #[serde(default)]
    pub rating: String,
}

/// GET /reviews/{id}?sort=
pub async fn reviews_page(
    State(state): State<Arc<AppState>>,
    Path(car_id): Path<i32>,
    Query(query): Query<ReviewsQuery>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    let car = state.catalog().get_car(car_id).await?;
    let sort = ReviewSort::from_query(query.sort.as_deref());
    let reviews = state.reviews().list_reviews(car_id, sort).await?;
    let user = current_user(&session).await?;

    Ok(Html(pages::reviews(&pages::ReviewsView {
        car: &car,
        reviews: &reviews,
        sort,
        username: user.as_ref().map(|u| u.username.as_str()),
        is_admin: user.as_ref().is_some_and(|u| u.is_admin),
    })))
}

/// POST /submit-review
pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<SubmitReviewForm>,
) -> Result<Redirect, ApiError> {
    let user = current_user(&session).await?;
    require_login(user.as_ref())?;

    let car_id = validation::parse_id("car_id", &form.car_id)?;
    let rating = validation::parse_optional_rating(&form.rating)?;

    state
        .reviews()
        .submit_review(
            user.as_ref(),
            ReviewSubmission {
                car_id,
                title: form.review_title,
                body: form.review_body,
                rating,
            },
        )
        .await?;

    Ok(Redirect::to(&format!("/reviews/{car_id}")))
}

/// POST /reviews/{id}/like
pub async fn like_review(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<i32>,
    headers: HeaderMap,
    session: Session,
) -> Result<Redirect, ApiError> {
    let user = current_user(&session).await?;
    state.reviews().like(user.as_ref(), review_id).await?;
    Ok(redirect_back(&state, &headers, review_id).await)
}

/// POST /reviews/{id}/dislike
pub async fn dislike_review(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<i32>,
    headers: HeaderMap,
    session: Session,
) -> Result<Redirect, ApiError> {
    let user = current_user(&session).await?;
    state.reviews().dislike(user.as_ref(), review_id).await?;
    Ok(redirect_back(&state, &headers, review_id).await)
}

/// POST /reviews/{id}/delete
pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<i32>,
    headers: HeaderMap,
    session: Session,
) -> Result<Redirect, ApiError> {
    let user = current_user(&session).await?;

    // Resolve the way back before the review disappears.
    let fallback = fallback_target(&state, review_id).await;
    state.reviews().delete(user.as_ref(), review_id).await?;

    Ok(Redirect::to(&same_origin_referer(&headers).unwrap_or(fallback)))
}

async fn fallback_target(state: &AppState, review_id: i32) -> String {
    state
        .reviews()
        .get_review(review_id)
        .await
        .map_or_else(|_| "/".to_string(), |r| format!("/reviews/{}", r.car_id))
}

async fn redirect_back(state: &AppState, headers: &HeaderMap, review_id: i32) -> Redirect {
    let target = match same_origin_referer(headers) {
        Some(path) => path,
        None => fallback_target(state, review_id).await,
    };
    Redirect::to(&target)
}

/// Path and query of the Referer, if it points back at this host.
fn same_origin_referer(headers: &HeaderMap) -> Option<String> {
    let referer = headers.get(header::REFERER)?.to_str().ok()?;

    if referer.starts_with('/') && !referer.starts_with("//") {
        return Some(referer.to_string());
    }

    let url = url::Url::parse(referer).ok()?;
    let host = headers.get(header::HOST)?.to_str().ok()?;
    let referer_host = match url.port() {
        Some(port) => format!("{}:{port}", url.host_str()?),
        None => url.host_str()?.to_string(),
    };

    if referer_host != host {
        return None;
    }

    Some(match url.query() {
        Some(q) => format!("{}?{q}", url.path()),
        None => url.path().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(referer: &str, host: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::REFERER, HeaderValue::from_str(referer).unwrap());
        h.insert(header::HOST, HeaderValue::from_str(host).unwrap());
        h
    }

    #[test]
    fn referer_on_same_host_keeps_path_and_query() {
        let h = headers("http://localhost:3000/reviews/4?sort=oldest", "localhost:3000");
        assert_eq!(
            same_origin_referer(&h).as_deref(),
            Some("/reviews/4?sort=oldest")
        );
    }

    #[test]
    fn foreign_referer_is_ignored() {
        let h = headers("https://evil.example/phish", "localhost:3000");
        assert_eq!(same_origin_referer(&h), None);

        let h = headers("//evil.example/phish", "localhost:3000");
        assert_eq!(same_origin_referer(&h), None);
    }

    #[test]
    fn relative_referer_is_used_as_is() {
        let h = headers("/reviews/9", "localhost:3000");
        assert_eq!(same_origin_referer(&h).as_deref(), Some("/reviews/9"));
    }
}
