//! Domain service for posting, listing, voting on and moderating reviews.

use crate::models::review::{Review, ReviewSort};
use crate::services::auth_service::{AuthError, UserSession};
use thiserror::Error;

/// Errors specific to review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("You must be logged in")]
    NotAuthenticated,

    #[error("Only admins can delete reviews")]
    Unauthorized,

    #[error("Review {0} not found")]
    NotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ReviewError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ReviewError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<AuthError> for ReviewError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotAuthenticated => Self::NotAuthenticated,
            AuthError::Unauthorized => Self::Unauthorized,
            AuthError::Validation(msg) => Self::Validation(msg),
            AuthError::Database(msg) => Self::Database(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Input for a new review, as submitted by the review form.
#[derive(Debug, Clone)]
pub struct ReviewSubmission {
    pub car_id: i32,
    pub title: String,
    pub body: String,
    pub rating: Option<i32>,
}

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Domain service trait for reviews.
///
/// Mutating operations take the caller's session explicitly; `None` means
/// the request carried no logged-in user.
#[async_trait::async_trait]
pub trait ReviewService: Send + Sync {
    /// Stores a review authored by the session's user and returns its id.
    async fn submit_review(
        &self,
        session: Option<&UserSession>,
        submission: ReviewSubmission,
    ) -> Result<i32, ReviewError>;

    /// Snapshot of a car's reviews in the requested order.
    async fn list_reviews(&self, car_id: i32, sort: ReviewSort)
    -> Result<Vec<Review>, ReviewError>;

    async fn get_review(&self, review_id: i32) -> Result<Review, ReviewError>;

    /// Adds a like. Returns false when this user had already liked the review.
    async fn like(&self, session: Option<&UserSession>, review_id: i32)
    -> Result<bool, ReviewError>;

    /// Adds a dislike. Returns false when this user had already disliked the review.
    async fn dislike(
        &self,
        session: Option<&UserSession>,
        review_id: i32,
    ) -> Result<bool, ReviewError>;

    /// Removes a review permanently. Admin sessions only.
    async fn delete(&self, session: Option<&UserSession>, review_id: i32)
    -> Result<(), ReviewError>;
}
