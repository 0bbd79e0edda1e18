//! Core service for libris: query translation, rating aggregation,
//! ownership authorization, cascade-consistent deletes, and search,
//! sitting between the HTTP modules and the document store.
//!
//! One [`CoreService`] is constructed per process and handed to every
//! module; all state lives in the store.

pub mod cascade;
pub mod error;
pub mod guard;
pub mod query;
pub mod rating;
pub mod search;

use std::collections::HashMap;
use std::sync::Arc;

use libris_http::Pagination;
use libris_store::{Collection, DocumentStore, Filter};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::modules::books::models::{Book, BookDetail, CreateBook};
use crate::modules::reviews::models::{CreateReview, Review, UpdateReview};
use error::CoreError;
use query::{ListQuery, PageParams};
use rating::RatingSummary;

const BOOKS: &str = "books";
const REVIEWS: &str = "reviews";

/// One page of books plus its pagination links.
#[derive(Debug)]
pub struct BookPage {
    pub items: Vec<Book>,
    pub pagination: Pagination,
}

/// The service object holding the store reference. Constructed once in
/// `main` and shared by all request handlers.
pub struct CoreService {
    books: Arc<dyn Collection>,
    reviews: Arc<dyn Collection>,
}

fn decode<T: DeserializeOwned>(doc: Value) -> Result<T, CoreError> {
    serde_json::from_value(doc).map_err(|err| CoreError::Store(err.into()))
}

fn encode<T: serde::Serialize>(entity: &T) -> Result<Value, CoreError> {
    serde_json::to_value(entity).map_err(|err| CoreError::Store(err.into()))
}

fn reviews_of(book_id: Uuid) -> Filter {
    Filter::field_eq("bookId", json!(book_id.to_string()))
}

impl CoreService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            books: store.collection(BOOKS),
            reviews: store.collection(REVIEWS),
        }
    }

    /// List books matching the client filter, windowed by `page`/`limit`.
    pub async fn list_books(
        &self,
        params: &HashMap<String, String>,
    ) -> Result<BookPage, CoreError> {
        let query = ListQuery::from_params(params)?;

        let total = self.books.count(&query.filter).await?;
        let docs = self
            .books
            .find(&query.filter, Some(query.page.window()))
            .await?;

        let items = docs
            .into_iter()
            .map(decode::<Book>)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BookPage {
            items,
            pagination: query.page.links(total),
        })
    }

    /// Create a book owned by the authenticated caller.
    pub async fn create_book(
        &self,
        identity: Option<Uuid>,
        payload: CreateBook,
    ) -> Result<Book, CoreError> {
        let owner = guard::require_identity(identity)?;
        let book = Book::create(payload.validate()?, owner);

        self.books.insert(encode(&book)?).await?;
        tracing::info!(book_id = %book.id, owner = %owner, "book created");
        Ok(book)
    }

    /// Fetch one book with a page of its reviews and the live rating
    /// aggregate. The aggregate always sees every review, independent
    /// of the page shown alongside it.
    pub async fn get_book(
        &self,
        id: Uuid,
        params: &HashMap<String, String>,
    ) -> Result<BookDetail, CoreError> {
        let doc = self
            .books
            .find_by_id(&id.to_string())
            .await?
            .ok_or_else(|| CoreError::not_found("book", id))?;
        let book: Book = decode(doc)?;

        let by_book = reviews_of(id);
        let page = PageParams::from_params(params);
        let review_page = self
            .reviews
            .find(&by_book, Some(page.window()))
            .await?
            .into_iter()
            .map(decode::<Review>)
            .collect::<Result<Vec<_>, _>>()?;

        let all_reviews = self
            .reviews
            .find(&by_book, None)
            .await?
            .into_iter()
            .map(decode::<Review>)
            .collect::<Result<Vec<_>, _>>()?;
        let summary = RatingSummary::from_ratings(all_reviews.iter().map(|r| r.rating));

        Ok(BookDetail {
            book,
            average_rating: summary.average_rating,
            review_count: summary.review_count,
            reviews: review_page,
        })
    }

    /// Delete a book and cascade its reviews. Owner only; checks run in
    /// the order identity, existence, ownership.
    pub async fn delete_book(&self, identity: Option<Uuid>, id: Uuid) -> Result<(), CoreError> {
        let user = guard::require_identity(identity)?;

        let doc = self
            .books
            .find_by_id(&id.to_string())
            .await?
            .ok_or_else(|| CoreError::not_found("book", id))?;
        let book: Book = decode(doc)?;

        guard::require_owner(user, book.owner_user_id, "delete this book")?;

        cascade::delete_book_tree(self.books.as_ref(), self.reviews.as_ref(), id).await?;
        tracing::info!(book_id = %id, "book deleted with review cascade");
        Ok(())
    }

    /// Add a review to an existing book, authored by the caller.
    pub async fn add_review(
        &self,
        identity: Option<Uuid>,
        book_id: Uuid,
        payload: CreateReview,
    ) -> Result<Review, CoreError> {
        let author = guard::require_identity(identity)?;

        self.books
            .find_by_id(&book_id.to_string())
            .await?
            .ok_or_else(|| CoreError::not_found("book", book_id))?;

        let review = Review::create(payload.validate()?, book_id, author);
        self.reviews.insert(encode(&review)?).await?;
        Ok(review)
    }

    /// Update a review. Author only; same check order as book deletion.
    pub async fn update_review(
        &self,
        identity: Option<Uuid>,
        id: Uuid,
        payload: UpdateReview,
    ) -> Result<Review, CoreError> {
        let user = guard::require_identity(identity)?;

        let doc = self
            .reviews
            .find_by_id(&id.to_string())
            .await?
            .ok_or_else(|| CoreError::not_found("review", id))?;
        let review: Review = decode(doc)?;

        guard::require_owner(user, review.user_id, "update this review")?;

        let patch = payload.validate()?;
        let updated = self
            .reviews
            .update(&id.to_string(), patch)
            .await?
            .ok_or_else(|| CoreError::not_found("review", id))?;
        decode(updated)
    }

    /// Delete a review. Author only.
    pub async fn delete_review(&self, identity: Option<Uuid>, id: Uuid) -> Result<(), CoreError> {
        let user = guard::require_identity(identity)?;

        let doc = self
            .reviews
            .find_by_id(&id.to_string())
            .await?
            .ok_or_else(|| CoreError::not_found("review", id))?;
        let review: Review = decode(doc)?;

        guard::require_owner(user, review.user_id, "delete this review")?;

        self.reviews.delete(&id.to_string()).await?;
        Ok(())
    }

    /// Free-text search on title/author, case-insensitive substring.
    pub async fn search_books(&self, query: Option<&str>) -> Result<Vec<Book>, CoreError> {
        let filter = search::title_author_filter(query)?;

        self.books
            .find(&filter, None)
            .await?
            .into_iter()
            .map(decode::<Book>)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::Genre;
    use libris_store::MemoryStore;

    fn service() -> CoreService {
        CoreService::new(Arc::new(MemoryStore::new()))
    }

    fn book_payload(title: &str, author: &str, year: i32) -> CreateBook {
        CreateBook {
            title: title.to_string(),
            author: author.to_string(),
            description: "a description".to_string(),
            genre: Some(Genre::Fiction),
            publication_year: Some(year),
        }
    }

    fn review_payload(rating: f64) -> CreateReview {
        CreateReview {
            rating: Some(rating),
            text: "a review".to_string(),
        }
    }

    fn no_params() -> HashMap<String, String> {
        HashMap::new()
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn create_then_get_book_with_zero_reviews() {
        let core = service();
        let owner = Uuid::now_v7();

        let book = core
            .create_book(Some(owner), book_payload("Dune", "Frank Herbert", 1965))
            .await
            .unwrap();

        let detail = core.get_book(book.id, &no_params()).await.unwrap();
        assert_eq!(detail.book.owner_user_id, owner);
        assert_eq!(detail.review_count, 0);
        assert_eq!(detail.average_rating, 0.0);
        assert!(detail.reviews.is_empty());
    }

    #[tokio::test]
    async fn create_book_requires_identity() {
        let core = service();
        let err = core
            .create_book(None, book_payload("Dune", "Frank Herbert", 1965))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn review_scenario_aggregates_and_cascades() {
        // Create book A (owner U1), reviews by U2 (4) and U3 (2):
        // averageRating 3.0, reviewCount 2. Delete by U1 cascades.
        let core = service();
        let u1 = Uuid::now_v7();
        let u2 = Uuid::now_v7();
        let u3 = Uuid::now_v7();

        let book = core
            .create_book(Some(u1), book_payload("Dune", "Frank Herbert", 1965))
            .await
            .unwrap();
        core.add_review(Some(u2), book.id, review_payload(4.0))
            .await
            .unwrap();
        core.add_review(Some(u3), book.id, review_payload(2.0))
            .await
            .unwrap();

        let detail = core.get_book(book.id, &no_params()).await.unwrap();
        assert_eq!(detail.review_count, 2);
        assert_eq!(detail.average_rating, 3.0);

        core.delete_book(Some(u1), book.id).await.unwrap();

        let err = core.get_book(book.id, &no_params()).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
        assert_eq!(core.reviews.count(&reviews_of(book.id)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_book_checks_run_in_order() {
        let core = service();
        let owner = Uuid::now_v7();
        let stranger = Uuid::now_v7();
        let book = core
            .create_book(Some(owner), book_payload("Dune", "Frank Herbert", 1965))
            .await
            .unwrap();

        // Unauthenticated before anything else.
        assert!(matches!(
            core.delete_book(None, book.id).await.unwrap_err(),
            CoreError::Unauthenticated(_)
        ));
        // Existence before ownership: a stranger probing a missing id
        // sees not-found, not forbidden.
        assert!(matches!(
            core.delete_book(Some(stranger), Uuid::now_v7())
                .await
                .unwrap_err(),
            CoreError::NotFound(_)
        ));
        // Ownership last.
        assert!(matches!(
            core.delete_book(Some(stranger), book.id).await.unwrap_err(),
            CoreError::Forbidden(_)
        ));
        // The book survived all refused attempts.
        assert!(core.get_book(book.id, &no_params()).await.is_ok());
        core.delete_book(Some(owner), book.id).await.unwrap();
    }

    #[tokio::test]
    async fn aggregate_sees_all_reviews_while_page_is_windowed() {
        let core = service();
        let owner = Uuid::now_v7();
        let book = core
            .create_book(Some(owner), book_payload("Dune", "Frank Herbert", 1965))
            .await
            .unwrap();
        for rating in [5.0, 4.0, 3.0] {
            core.add_review(Some(Uuid::now_v7()), book.id, review_payload(rating))
                .await
                .unwrap();
        }

        let detail = core
            .get_book(book.id, &params(&[("limit", "2")]))
            .await
            .unwrap();
        assert_eq!(detail.reviews.len(), 2);
        assert_eq!(detail.review_count, 3);
        assert_eq!(detail.average_rating, 4.0);
    }

    #[tokio::test]
    async fn deleting_last_review_resets_aggregate() {
        let core = service();
        let owner = Uuid::now_v7();
        let reviewer = Uuid::now_v7();
        let book = core
            .create_book(Some(owner), book_payload("Dune", "Frank Herbert", 1965))
            .await
            .unwrap();
        let review = core
            .add_review(Some(reviewer), book.id, review_payload(4.0))
            .await
            .unwrap();

        core.delete_review(Some(reviewer), review.id).await.unwrap();

        let detail = core.get_book(book.id, &no_params()).await.unwrap();
        assert_eq!(detail.review_count, 0);
        assert_eq!(detail.average_rating, 0.0);
    }

    #[tokio::test]
    async fn add_review_requires_existing_book() {
        let core = service();
        let err = core
            .add_review(Some(Uuid::now_v7()), Uuid::now_v7(), review_payload(4.0))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn review_mutation_is_author_only() {
        let core = service();
        let owner = Uuid::now_v7();
        let author = Uuid::now_v7();
        let stranger = Uuid::now_v7();
        let book = core
            .create_book(Some(owner), book_payload("Dune", "Frank Herbert", 1965))
            .await
            .unwrap();
        let review = core
            .add_review(Some(author), book.id, review_payload(4.0))
            .await
            .unwrap();

        let update = UpdateReview {
            rating: Some(2.0),
            text: None,
        };
        assert!(matches!(
            core.update_review(Some(stranger), review.id, update.clone())
                .await
                .unwrap_err(),
            CoreError::Forbidden(_)
        ));
        assert!(matches!(
            core.delete_review(Some(stranger), review.id)
                .await
                .unwrap_err(),
            CoreError::Forbidden(_)
        ));

        let updated = core
            .update_review(Some(author), review.id, update)
            .await
            .unwrap();
        assert_eq!(updated.rating, 2.0);
        assert_eq!(updated.text, "a review");
        assert_eq!(updated.book_id, book.id);
    }

    #[tokio::test]
    async fn list_books_filters_and_paginates() {
        let core = service();
        let owner = Uuid::now_v7();
        for year in 1990..2002 {
            core.create_book(Some(owner), book_payload("Title", "Author", year))
                .await
                .unwrap();
        }

        // publicationYear >= 2000 selects exactly 2000 and 2001.
        let page = core
            .list_books(&params(&[("publicationYear[gte]", "2000")]))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.items.iter().all(|b| b.publication_year >= 2000));
        assert!(page.pagination.next.is_none());
        assert!(page.pagination.prev.is_none());

        // All 12 books, 5 per page: page 2 has both links.
        let page = core
            .list_books(&params(&[("page", "2"), ("limit", "5")]))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 5);
        assert!(page.pagination.next.is_some());
        assert!(page.pagination.prev.is_some());

        // Pagination totals respect the filter, not the whole collection.
        let page = core
            .list_books(&params(&[("publicationYear[lt]", "1995"), ("limit", "5")]))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 5);
        assert!(page.pagination.next.is_none());
    }

    #[tokio::test]
    async fn search_matches_title_or_author_case_insensitive() {
        let core = service();
        let owner = Uuid::now_v7();
        core.create_book(Some(owner), book_payload("Dune", "Frank Herbert", 1965))
            .await
            .unwrap();
        core.create_book(
            Some(owner),
            book_payload("Sandworms", "Frank Dune-ish", 2001),
        )
        .await
        .unwrap();
        core.create_book(Some(owner), book_payload("Foundation", "Isaac Asimov", 1951))
            .await
            .unwrap();

        let hits = core.search_books(Some("dune")).await.unwrap();
        assert_eq!(hits.len(), 2);

        assert!(matches!(
            core.search_books(Some("")).await.unwrap_err(),
            CoreError::BadRequest(_)
        ));
        assert!(matches!(
            core.search_books(None).await.unwrap_err(),
            CoreError::BadRequest(_)
        ));
    }
}
