use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::core::error::CoreError;
use crate::modules::reviews::models::Review;

/// Maximum accepted title length, in characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Closed set of accepted genres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Genre {
    Fiction,
    #[serde(rename = "Non-Fiction")]
    NonFiction,
    #[serde(rename = "Science Fiction")]
    ScienceFiction,
    Fantasy,
    Mystery,
    Thriller,
    Romance,
    Biography,
    History,
    #[serde(rename = "Self-Help")]
    SelfHelp,
    Other,
}

/// A stored book document. `averageRating` and `reviewCount` are never
/// part of this type; they are computed on read (see [`BookDetail`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub genre: Genre,
    pub publication_year: i32,
    /// Creating user; immutable after creation.
    pub owner_user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Book {
    /// Construct a book from a validated payload, owned by `owner`.
    pub fn create(payload: ValidBook, owner: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: payload.title,
            author: payload.author,
            description: payload.description,
            genre: payload.genre,
            publication_year: payload.publication_year,
            owner_user_id: owner,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Client payload for creating a book. All fields are validated in
/// [`CreateBook::validate`]; missing ones surface as field-level
/// validation errors rather than body-parse failures.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genre: Option<Genre>,
    #[serde(default)]
    pub publication_year: Option<i32>,
}

/// A [`CreateBook`] that passed validation, with title and author trimmed.
#[derive(Debug, Clone)]
pub struct ValidBook {
    pub title: String,
    pub author: String,
    pub description: String,
    pub genre: Genre,
    pub publication_year: i32,
}

impl CreateBook {
    pub fn validate(self) -> Result<ValidBook, CoreError> {
        let mut details = Vec::new();

        let title = self.title.trim().to_string();
        if title.is_empty() {
            details.push(json!({"field": "title", "error": "required"}));
        } else if title.chars().count() > MAX_TITLE_LEN {
            details.push(json!({
                "field": "title",
                "error": format!("must be at most {MAX_TITLE_LEN} characters")
            }));
        }

        let author = self.author.trim().to_string();
        if author.is_empty() {
            details.push(json!({"field": "author", "error": "required"}));
        }

        if self.description.trim().is_empty() {
            details.push(json!({"field": "description", "error": "required"}));
        }

        if self.genre.is_none() {
            details.push(json!({"field": "genre", "error": "required"}));
        }

        if self.publication_year.is_none() {
            details.push(json!({"field": "publicationYear", "error": "required"}));
        }

        match (self.genre, self.publication_year) {
            (Some(genre), Some(publication_year)) if details.is_empty() => Ok(ValidBook {
                title,
                author,
                description: self.description,
                genre,
                publication_year,
            }),
            _ => Err(CoreError::validation(details, "invalid book payload")),
        }
    }
}

/// Read-side view of a single book: the stored document joined with its
/// reviews page and the live rating aggregate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Book,
    pub average_rating: f64,
    pub review_count: usize,
    pub reviews: Vec<Review>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateBook {
        CreateBook {
            title: "  Dune  ".to_string(),
            author: " Frank Herbert ".to_string(),
            description: "Spice and sand".to_string(),
            genre: Some(Genre::ScienceFiction),
            publication_year: Some(1965),
        }
    }

    #[test]
    fn validate_trims_title_and_author() {
        let valid = payload().validate().unwrap();
        assert_eq!(valid.title, "Dune");
        assert_eq!(valid.author, "Frank Herbert");
    }

    #[test]
    fn validate_collects_all_missing_fields() {
        let empty = CreateBook {
            title: String::new(),
            author: String::new(),
            description: String::new(),
            genre: None,
            publication_year: None,
        };
        let err = empty.validate().unwrap_err();
        match err {
            CoreError::Validation { details, .. } => assert_eq!(details.len(), 5),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_overlong_title() {
        let mut long = payload();
        long.title = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(long.validate().is_err());
    }

    #[test]
    fn genre_serializes_with_display_names() {
        assert_eq!(
            serde_json::to_value(Genre::ScienceFiction).unwrap(),
            serde_json::json!("Science Fiction")
        );
        assert_eq!(
            serde_json::from_value::<Genre>(serde_json::json!("Self-Help")).unwrap(),
            Genre::SelfHelp
        );
        assert!(serde_json::from_value::<Genre>(serde_json::json!("Cooking")).is_err());
    }

    #[test]
    fn book_round_trips_through_camel_case_json() {
        let owner = Uuid::now_v7();
        let book = Book::create(payload().validate().unwrap(), owner);
        let value = serde_json::to_value(&book).unwrap();

        assert!(value.get("publicationYear").is_some());
        assert!(value.get("ownerUserId").is_some());
        assert!(value.get("createdAt").is_some());

        let back: Book = serde_json::from_value(value).unwrap();
        assert_eq!(back.id, book.id);
        assert_eq!(back.owner_user_id, owner);
    }
}
