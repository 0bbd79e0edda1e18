//! Read-time rating aggregation.
//!
//! The aggregate is always recomputed from the live review set and
//! never persisted on the book, so it cannot drift from the reviews.

use serde::Serialize;

/// Per-book rating aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub review_count: usize,
    pub average_rating: f64,
}

impl RatingSummary {
    /// Mean of all ratings rounded to one decimal place; 0 for the
    /// empty set.
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        for rating in ratings {
            count += 1;
            sum += rating;
        }

        let average_rating = if count == 0 {
            0.0
        } else {
            round_one_decimal(sum / count as f64)
        };

        Self {
            review_count: count,
            average_rating,
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
