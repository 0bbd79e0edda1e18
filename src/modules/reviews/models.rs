use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::core::error::CoreError;

/// Accepted rating bounds, inclusive.
pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

/// A stored review document, tied to a book by `bookId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub book_id: Uuid,
    /// Authoring user; only they may update or delete the review.
    pub user_id: Uuid,
    pub rating: f64,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Review {
    pub fn create(payload: ValidReview, book_id: Uuid, author: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            book_id,
            user_id: author,
            rating: payload.rating,
            text: payload.text,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

fn rating_in_range(rating: f64) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

fn rating_range_detail() -> Value {
    json!({
        "field": "rating",
        "error": format!("must be between {MIN_RATING} and {MAX_RATING}")
    })
}

/// Client payload for creating a review.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReview {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ValidReview {
    pub rating: f64,
    pub text: String,
}

impl CreateReview {
    pub fn validate(self) -> Result<ValidReview, CoreError> {
        let mut details = Vec::new();

        let rating = match self.rating {
            None => {
                details.push(json!({"field": "rating", "error": "required"}));
                None
            }
            Some(rating) if !rating_in_range(rating) => {
                details.push(rating_range_detail());
                None
            }
            Some(rating) => Some(rating),
        };

        if self.text.trim().is_empty() {
            details.push(json!({"field": "text", "error": "required"}));
        }

        match rating {
            Some(rating) if details.is_empty() => Ok(ValidReview {
                rating,
                text: self.text,
            }),
            _ => Err(CoreError::validation(details, "invalid review payload")),
        }
    }
}

/// Partial update payload; `bookId`, `userId`, and `createdAt` are
/// immutable and not accepted here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReview {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub text: Option<String>,
}

impl UpdateReview {
    /// Validate present fields and build the store patch.
    pub fn validate(self) -> Result<Value, CoreError> {
        let mut details = Vec::new();
        let mut patch = Map::new();

        if let Some(rating) = self.rating {
            if rating_in_range(rating) {
                patch.insert("rating".to_string(), json!(rating));
            } else {
                details.push(rating_range_detail());
            }
        }

        if let Some(text) = self.text {
            if text.trim().is_empty() {
                details.push(json!({"field": "text", "error": "must not be empty"}));
            } else {
                patch.insert("text".to_string(), json!(text));
            }
        }

        if !details.is_empty() {
            return Err(CoreError::validation(details, "invalid review payload"));
        }
        if patch.is_empty() {
            return Err(CoreError::validation(
                vec![json!({"field": "rating", "error": "provide rating or text"})],
                "nothing to update",
            ));
        }

        Ok(Value::Object(patch))
    }
}
