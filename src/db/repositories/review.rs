use crate::entities::{prelude::*, review_votes, reviews};
use crate::models::review::{NewReview, Review, ReviewSort, VoteKind, VoteOutcome};
use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
    TransactionTrait,
};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// Repository for reviews and the votes cast on them
pub struct ReviewRepository {
    conn: DatabaseConnection,
}

#[derive(Default)]
struct Voters {
    liked_by: BTreeSet<i32>,
    disliked_by: BTreeSet<i32>,
}

impl ReviewRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_review(r: reviews::Model, voters: Voters) -> Review {
        Review {
            id: r.id,
            car_id: r.car_id,
            title: r.title,
            body: r.body,
            rating: r.rating,
            author: r.author,
            date_posted: r.date_posted,
            likes: r.likes,
            dislikes: r.dislikes,
            liked_by: voters.liked_by,
            disliked_by: voters.disliked_by,
        }
    }

    async fn voters_for(&self, review_ids: Vec<i32>) -> Result<HashMap<i32, Voters>> {
        let mut map: HashMap<i32, Voters> = HashMap::new();
        if review_ids.is_empty() {
            return Ok(map);
        }

        let votes = ReviewVotes::find()
            .filter(review_votes::Column::ReviewId.is_in(review_ids))
            .all(&self.conn)
            .await
            .context("Failed to query review votes")?;

        for vote in votes {
            let entry = map.entry(vote.review_id).or_default();
            match vote.kind {
                VoteKind::Like => entry.liked_by.insert(vote.user_id),
                VoteKind::Dislike => entry.disliked_by.insert(vote.user_id),
            };
        }

        Ok(map)
    }

    pub async fn add(&self, review: NewReview) -> Result<i32> {
        let car_id = review.car_id;
        let active = reviews::ActiveModel {
            car_id: Set(review.car_id),
            title: Set(review.title),
            body: Set(review.body),
            rating: Set(review.rating),
            author: Set(review.author),
            date_posted: Set(review.date_posted),
            likes: Set(0),
            dislikes: Set(0),
            ..Default::default()
        };

        let res = Reviews::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert review")?;

        info!("Added review {} for car {}", res.last_insert_id, car_id);
        Ok(res.last_insert_id)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Review>> {
        let Some(row) = Reviews::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query review by ID")?
        else {
            return Ok(None);
        };

        let voters = self
            .voters_for(vec![id])
            .await?
            .remove(&id)
            .unwrap_or_default();

        Ok(Some(Self::map_review(row, voters)))
    }

    /// Reviews of one car in the requested order. Ties keep insertion order.
    pub async fn list_for_car(&self, car_id: i32, sort: ReviewSort) -> Result<Vec<Review>> {
        let query = Reviews::find().filter(reviews::Column::CarId.eq(car_id));

        let query = match sort {
            ReviewSort::Newest => query.order_by_desc(reviews::Column::DatePosted),
            ReviewSort::Oldest => query.order_by_asc(reviews::Column::DatePosted),
            ReviewSort::MostLiked => query.order_by_desc(reviews::Column::Likes),
            ReviewSort::MostDisliked => query.order_by_desc(reviews::Column::Dislikes),
        };

        let rows = query
            .order_by_asc(reviews::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query reviews for car")?;

        let mut voters = self.voters_for(rows.iter().map(|r| r.id).collect()).await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                let v = voters.remove(&r.id).unwrap_or_default();
                Self::map_review(r, v)
            })
            .collect())
    }

    /// Records one vote and bumps the matching counter in the same transaction.
    ///
    /// The INSERT must stay the first statement: a deferred SQLite transaction
    /// that reads first cannot upgrade to a write lock while another writer
    /// holds it. The unique index on (`review_id`, `user_id`, `kind`) is the
    /// membership check; the foreign key and the counter update both catch a
    /// missing review.
    pub async fn record_vote(
        &self,
        review_id: i32,
        user_id: i32,
        kind: VoteKind,
    ) -> Result<VoteOutcome> {
        let txn = self.conn.begin().await?;

        let vote = review_votes::ActiveModel {
            review_id: Set(review_id),
            user_id: Set(user_id),
            kind: Set(kind),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        if let Err(e) = ReviewVotes::insert(vote).exec(&txn).await {
            let outcome = match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => VoteOutcome::AlreadyCounted,
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => VoteOutcome::ReviewMissing,
                _ => return Err(e).context("Failed to insert vote"),
            };
            debug!(review_id, user_id, ?kind, ?outcome, "Vote not recorded");
            txn.rollback().await?;
            return Ok(outcome);
        }

        let counter = match kind {
            VoteKind::Like => reviews::Column::Likes,
            VoteKind::Dislike => reviews::Column::Dislikes,
        };

        let updated = Reviews::update_many()
            .col_expr(counter, Expr::col(counter).add(1))
            .filter(reviews::Column::Id.eq(review_id))
            .exec(&txn)
            .await
            .context("Failed to bump vote counter")?;

        if updated.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(VoteOutcome::ReviewMissing);
        }

        txn.commit().await?;
        Ok(VoteOutcome::Counted)
    }

    /// Deletes a review and its votes. Returns false if the review did not exist.
    pub async fn remove(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        ReviewVotes::delete_many()
            .filter(review_votes::Column::ReviewId.eq(id))
            .exec(&txn)
            .await?;

        let result = Reviews::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}
