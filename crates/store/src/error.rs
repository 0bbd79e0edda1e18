use thiserror::Error;

/// Failures surfaced by the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Document is not an object or lacks a usable string `id` field.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// Insert collided with an existing document id.
    #[error("duplicate document id '{0}'")]
    DuplicateId(String),

    /// A stored document failed to (de)serialize into its entity type.
    #[error("document serialization failed")]
    Serde(#[from] serde_json::Error),
}
