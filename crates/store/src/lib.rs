//! Document-collection store for libris.
//!
//! The service core talks to persistence exclusively through the
//! [`DocumentStore`] and [`Collection`] traits: filter-based find,
//! create, update, delete, delete-many, and count over JSON documents
//! addressed by a unique string `id` field. [`memory::MemoryStore`]
//! is the in-process backend.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub mod error;
pub mod filter;
pub mod memory;

pub use error::StoreError;
pub use filter::{Condition, Filter, Predicate, Window};
pub use memory::MemoryStore;

/// A named collection of JSON documents.
///
/// Every document is a JSON object carrying a string `id` field that is
/// unique within the collection.
#[async_trait]
pub trait Collection: Send + Sync {
    /// Insert a document. The document must carry a unique `id`.
    async fn insert(&self, doc: Value) -> Result<Value, StoreError>;

    /// Find documents matching `filter`, optionally windowed.
    async fn find(&self, filter: &Filter, window: Option<Window>) -> Result<Vec<Value>, StoreError>;

    /// Fetch a single document by id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Value>, StoreError>;

    /// Shallow-merge `patch` into the document with the given id.
    /// Returns the updated document, or `None` if the id does not resolve.
    /// The `id` field itself is immutable and ignored in patches.
    async fn update(&self, id: &str, patch: Value) -> Result<Option<Value>, StoreError>;

    /// Delete a document by id. Returns whether a document was removed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Delete every document matching `filter`. Returns the number removed.
    async fn delete_many(&self, filter: &Filter) -> Result<u64, StoreError>;

    /// Count documents matching `filter`, ignoring any window.
    async fn count(&self, filter: &Filter) -> Result<u64, StoreError>;
}

/// Factory for named collections.
pub trait DocumentStore: Send + Sync {
    fn collection(&self, name: &str) -> Arc<dyn Collection>;
}
