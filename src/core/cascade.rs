//! Cascading delete keeping books and reviews referentially consistent.

use libris_store::{Collection, Filter, StoreError};
use serde_json::json;
use uuid::Uuid;

/// Delete a book and every review referencing it.
///
/// The review bulk-delete runs strictly before the book delete, so no
/// review can reference a missing book even transiently. If the review
/// delete fails, the book delete never runs. A book with zero reviews
/// is a no-op cascade followed by the book delete.
pub async fn delete_book_tree(
    books: &dyn Collection,
    reviews: &dyn Collection,
    book_id: Uuid,
) -> Result<(), StoreError> {
    let id = book_id.to_string();
    let dependents = Filter::field_eq("bookId", json!(id.clone()));

    let removed = reviews.delete_many(&dependents).await?;
    tracing::debug!(book_id = %id, removed, "cascaded review delete");

    books.delete(&id).await?;
    Ok(())
}
