use serde::{Deserialize, Serialize};

use prodcat_core::ValueObject;

use crate::rating::Rating;

/// A single customer review: a star rating plus free text.
///
/// Reviews are ordered by rating first (comment breaks ties so the order is
/// total). Reports usually want the reverse of this order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Review {
    rating: Rating,
    comment: String,
}

impl ValueObject for Review {}

impl Review {
    pub fn new(rating: Rating, comment: impl Into<String>) -> Self {
        Self {
            rating,
            comment: comment.into(),
        }
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}

/// Sorts `reviews` best-first.
pub fn sort_best_first(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| b.cmp(a));
}
