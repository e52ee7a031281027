use serde::Serialize;
use std::collections::BTreeSet;

pub use crate::entities::review_votes::VoteKind;

/// Ordering applied when listing the reviews of a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewSort {
    #[default]
    Newest,
    Oldest,
    MostLiked,
    MostDisliked,
}

impl ReviewSort {
    pub const ALL: [Self; 4] = [
        Self::Newest,
        Self::Oldest,
        Self::MostLiked,
        Self::MostDisliked,
    ];

    /// Parses the `sort` query value. Missing or unknown values mean newest first.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("oldest") => Self::Oldest,
            Some("mostLiked") => Self::MostLiked,
            Some("mostDisliked") => Self::MostDisliked,
            _ => Self::Newest,
        }
    }

    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::MostLiked => "mostLiked",
            Self::MostDisliked => "mostDisliked",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::Oldest => "Oldest",
            Self::MostLiked => "Most liked",
            Self::MostDisliked => "Most disliked",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub id: i32,
    pub car_id: i32,
    pub title: String,
    pub body: String,
    pub rating: i32,
    pub author: String,
    pub date_posted: String,
    pub likes: i32,
    pub dislikes: i32,
    pub liked_by: BTreeSet<i32>,
    pub disliked_by: BTreeSet<i32>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub car_id: i32,
    pub title: String,
    pub body: String,
    pub rating: i32,
    pub author: String,
    pub date_posted: String,
}

/// Result of recording a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Counted,
    AlreadyCounted,
    ReviewMissing,
}
