//! `SeaORM` implementation of the `ReviewService` trait.

use crate::db::Store;
use crate::models::review::{NewReview, Review, ReviewSort, VoteKind, VoteOutcome};
use crate::services::auth_service::{UserSession, require_admin, require_login};
use crate::services::review_service::{
    MAX_RATING, MIN_RATING, ReviewError, ReviewService, ReviewSubmission,
};
use async_trait::async_trait;
use chrono::SecondsFormat;
use tracing::{debug, info};

pub struct SeaOrmReviewService {
    store: Store,
}

impl SeaOrmReviewService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn vote(
        &self,
        session: Option<&UserSession>,
        review_id: i32,
        kind: VoteKind,
    ) -> Result<bool, ReviewError> {
        let user = require_login(session)?;

        match self.store.record_vote(review_id, user.user_id, kind).await? {
            VoteOutcome::Counted => {
                metrics::counter!("review_votes_total", "kind" => vote_label(kind)).increment(1);
                Ok(true)
            }
            VoteOutcome::AlreadyCounted => {
                debug!(review_id, user_id = user.user_id, ?kind, "Repeat vote ignored");
                Ok(false)
            }
            VoteOutcome::ReviewMissing => Err(ReviewError::NotFound(review_id)),
        }
    }
}

const fn vote_label(kind: VoteKind) -> &'static str {
    match kind {
        VoteKind::Like => "like",
        VoteKind::Dislike => "dislike",
    }
}

fn validate_submission(submission: &ReviewSubmission) -> Result<i32, ReviewError> {
    if submission.title.trim().is_empty() {
        return Err(ReviewError::Validation("Review title is required".to_string()));
    }

    if submission.body.trim().is_empty() {
        return Err(ReviewError::Validation("Review body is required".to_string()));
    }

    let rating = submission
        .rating
        .ok_or_else(|| ReviewError::Validation("Rating is required".to_string()))?;

    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ReviewError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }

    Ok(rating)
}

#[async_trait]
impl ReviewService for SeaOrmReviewService {
    async fn submit_review(
        &self,
        session: Option<&UserSession>,
        submission: ReviewSubmission,
    ) -> Result<i32, ReviewError> {
        let user = require_login(session)?;
        let rating = validate_submission(&submission)?;

        // The author comes from the stored account, not from the form.
        let author = self
            .store
            .get_user_by_id(user.user_id)
            .await?
            .ok_or(ReviewError::NotAuthenticated)?
            .username;

        let id = self
            .store
            .add_review(NewReview {
                car_id: submission.car_id,
                title: submission.title.trim().to_string(),
                body: submission.body.trim().to_string(),
                rating,
                author,
                date_posted: chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            })
            .await?;

        metrics::counter!("reviews_submitted_total").increment(1);
        Ok(id)
    }

    async fn list_reviews(
        &self,
        car_id: i32,
        sort: ReviewSort,
    ) -> Result<Vec<Review>, ReviewError> {
        Ok(self.store.list_reviews(car_id, sort).await?)
    }

    async fn get_review(&self, review_id: i32) -> Result<Review, ReviewError> {
        self.store
            .get_review(review_id)
            .await?
            .ok_or(ReviewError::NotFound(review_id))
    }

    async fn like(
        &self,
        session: Option<&UserSession>,
        review_id: i32,
    ) -> Result<bool, ReviewError> {
        self.vote(session, review_id, VoteKind::Like).await
    }

    async fn dislike(
        &self,
        session: Option<&UserSession>,
        review_id: i32,
    ) -> Result<bool, ReviewError> {
        self.vote(session, review_id, VoteKind::Dislike).await
    }

    async fn delete(
        &self,
        session: Option<&UserSession>,
        review_id: i32,
    ) -> Result<(), ReviewError> {
        let admin = require_admin(session)?;

        if !self.store.remove_review(review_id).await? {
            return Err(ReviewError::NotFound(review_id));
        }

        info!("Review {review_id} deleted by admin {}", admin.username);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;
    use crate::db::test_support::temp_store;

    async fn setup() -> (SeaOrmReviewService, Store, UserSession, UserSession) {
        let store = temp_store().await;
        let security = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        };
        let alice = store
            .create_user("a@x.com", "alice", "pw123", &security)
            .await
            .unwrap();
        let bob = store
            .create_user("b@x.com", "bob", "pw456", &security)
            .await
            .unwrap();

        (
            SeaOrmReviewService::new(store.clone()),
            store,
            UserSession {
                user_id: alice,
                username: "alice".to_string(),
                is_admin: false,
            },
            UserSession {
                user_id: bob,
                username: "bob".to_string(),
                is_admin: true,
            },
        )
    }

    fn submission(car_id: i32, title: &str) -> ReviewSubmission {
        ReviewSubmission {
            car_id,
            title: title.to_string(),
            body: "Loved it".to_string(),
            rating: Some(5),
        }
    }

    fn assert_counts_match(review: &Review) {
        assert_eq!(usize::try_from(review.likes).unwrap(), review.liked_by.len());
        assert_eq!(
            usize::try_from(review.dislikes).unwrap(),
            review.disliked_by.len()
        );
    }

    #[tokio::test]
    async fn submit_requires_login() {
        let (service, _, _, _) = setup().await;
        let err = service
            .submit_review(None, submission(42, "Great"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::NotAuthenticated));
    }

    #[tokio::test]
    async fn submit_validates_fields() {
        let (service, _, alice, _) = setup().await;

        let missing_title = submission(42, "  ");
        assert!(matches!(
            service.submit_review(Some(&alice), missing_title).await,
            Err(ReviewError::Validation(_))
        ));

        let mut missing_rating = submission(42, "Great");
        missing_rating.rating = None;
        assert!(matches!(
            service.submit_review(Some(&alice), missing_rating).await,
            Err(ReviewError::Validation(_))
        ));

        let mut out_of_range = submission(42, "Great");
        out_of_range.rating = Some(9);
        assert!(matches!(
            service.submit_review(Some(&alice), out_of_range).await,
            Err(ReviewError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn submitted_review_is_listed_with_author_and_zero_votes() {
        let (service, _, alice, _) = setup().await;

        let id = service
            .submit_review(Some(&alice), submission(42, "Great"))
            .await
            .unwrap();

        let reviews = service.list_reviews(42, ReviewSort::Newest).await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].id, id);
        assert_eq!(reviews[0].author, "alice");
        assert_eq!(reviews[0].title, "Great");
        assert_eq!(reviews[0].body, "Loved it");
        assert_eq!(reviews[0].rating, 5);
        assert_eq!(reviews[0].likes, 0);
        assert_eq!(reviews[0].dislikes, 0);
    }

    #[tokio::test]
    async fn liking_twice_counts_once() {
        let (service, _, alice, _) = setup().await;
        let id = service
            .submit_review(Some(&alice), submission(1, "t"))
            .await
            .unwrap();

        assert!(service.like(Some(&alice), id).await.unwrap());
        assert!(!service.like(Some(&alice), id).await.unwrap());

        let review = service.get_review(id).await.unwrap();
        assert_eq!(review.likes, 1);
        assert_eq!(review.liked_by.iter().copied().collect::<Vec<_>>(), vec![alice.user_id]);
    }

    #[tokio::test]
    async fn vote_counters_track_voter_sets() {
        let (service, _, alice, bob) = setup().await;
        let id = service
            .submit_review(Some(&alice), submission(1, "t"))
            .await
            .unwrap();

        let steps: [(&UserSession, VoteKind); 7] = [
            (&alice, VoteKind::Like),
            (&bob, VoteKind::Dislike),
            (&alice, VoteKind::Like),
            (&bob, VoteKind::Like),
            (&alice, VoteKind::Dislike),
            (&bob, VoteKind::Dislike),
            (&bob, VoteKind::Like),
        ];

        for (user, kind) in steps {
            match kind {
                VoteKind::Like => service.like(Some(user), id).await.unwrap(),
                VoteKind::Dislike => service.dislike(Some(user), id).await.unwrap(),
            };
            assert_counts_match(&service.get_review(id).await.unwrap());
        }

        let review = service.get_review(id).await.unwrap();
        assert_eq!(review.likes, 2);
        assert_eq!(review.dislikes, 2);
    }

    #[tokio::test]
    async fn like_keeps_an_earlier_dislike() {
        let (service, _, alice, _) = setup().await;
        let id = service
            .submit_review(Some(&alice), submission(1, "t"))
            .await
            .unwrap();

        service.dislike(Some(&alice), id).await.unwrap();
        service.like(Some(&alice), id).await.unwrap();

        let review = service.get_review(id).await.unwrap();
        assert!(review.liked_by.contains(&alice.user_id));
        assert!(review.disliked_by.contains(&alice.user_id));
    }

    #[tokio::test]
    async fn voting_requires_login_and_existing_review() {
        let (service, _, alice, _) = setup().await;

        assert!(matches!(
            service.like(None, 1).await,
            Err(ReviewError::NotAuthenticated)
        ));
        assert!(matches!(
            service.dislike(Some(&alice), 404).await,
            Err(ReviewError::NotFound(404))
        ));
    }

    #[tokio::test]
    async fn most_liked_is_non_increasing() {
        let (service, _, alice, bob) = setup().await;
        let a = service
            .submit_review(Some(&alice), submission(5, "a"))
            .await
            .unwrap();
        let b = service
            .submit_review(Some(&alice), submission(5, "b"))
            .await
            .unwrap();
        let c = service
            .submit_review(Some(&alice), submission(5, "c"))
            .await
            .unwrap();

        service.like(Some(&alice), b).await.unwrap();
        service.like(Some(&bob), b).await.unwrap();
        service.like(Some(&bob), c).await.unwrap();
        service.dislike(Some(&bob), a).await.unwrap();

        let liked = service.list_reviews(5, ReviewSort::MostLiked).await.unwrap();
        assert!(liked.windows(2).all(|w| w[0].likes >= w[1].likes));
        assert_eq!(
            liked.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![b, c, a]
        );

        let disliked = service
            .list_reviews(5, ReviewSort::MostDisliked)
            .await
            .unwrap();
        assert_eq!(disliked[0].id, a);
        assert!(disliked.windows(2).all(|w| w[0].dislikes >= w[1].dislikes));
    }

    #[tokio::test]
    async fn delete_is_admin_only() {
        let (service, _, alice, bob) = setup().await;
        let id = service
            .submit_review(Some(&alice), submission(3, "t"))
            .await
            .unwrap();

        assert!(matches!(
            service.delete(Some(&alice), id).await,
            Err(ReviewError::Unauthorized)
        ));
        assert!(matches!(
            service.delete(None, id).await,
            Err(ReviewError::Unauthorized)
        ));
        assert_eq!(service.list_reviews(3, ReviewSort::Newest).await.unwrap().len(), 1);

        service.delete(Some(&bob), id).await.unwrap();
        assert!(service.list_reviews(3, ReviewSort::Newest).await.unwrap().is_empty());

        assert!(matches!(
            service.delete(Some(&bob), id).await,
            Err(ReviewError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_trusts_the_session_flag() {
        let (service, store, alice, _) = setup().await;
        let id = service
            .submit_review(Some(&alice), submission(3, "t"))
            .await
            .unwrap();

        // Promoted in the database after the session was issued.
        store.set_user_admin("alice", true).await.unwrap();
        assert!(matches!(
            service.delete(Some(&alice), id).await,
            Err(ReviewError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn submit_with_stale_session_user_fails() {
        let (service, _, _, _) = setup().await;
        let ghost = UserSession {
            user_id: 9999,
            username: "ghost".to_string(),
            is_admin: false,
        };

        assert!(matches!(
            service.submit_review(Some(&ghost), submission(1, "t")).await,
            Err(ReviewError::NotAuthenticated)
        ));
    }
}
