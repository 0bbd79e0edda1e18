//! Tagged error taxonomy for core operations.

use libris_http::ApiError;
use libris_store::StoreError;
use thiserror::Error;
use uuid::Uuid;

/// Every core operation fails with exactly one of these kinds; the HTTP
/// boundary maps each to a fixed status code. Store failures are never
/// partially masked: the cause propagates intact and is logged at the
/// boundary.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{message}")]
    Validation {
        details: Vec<serde_json::Value>,
        message: String,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    pub fn validation(details: Vec<serde_json::Value>, message: impl Into<String>) -> Self {
        Self::Validation {
            details,
            message: message.into(),
        }
    }

    pub fn not_found(kind: &str, id: Uuid) -> Self {
        Self::NotFound(format!("{kind} {id}"))
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { details, message } => ApiError::validation(details, message),
            CoreError::NotFound(message) => ApiError::not_found(message),
            CoreError::Unauthenticated(message) => ApiError::unauthenticated(message),
            CoreError::Forbidden(message) => ApiError::forbidden(message),
            CoreError::BadRequest(message) => ApiError::bad_request(message),
            CoreError::Store(cause) => ApiError::Internal(anyhow::Error::new(cause)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_become_internal_api_errors() {
        let err = CoreError::Store(StoreError::DuplicateId("b1".to_string()));
        assert!(matches!(ApiError::from(err), ApiError::Internal(_)));
    }

    #[test]
    fn taxonomy_maps_one_to_one() {
        assert!(matches!(
            ApiError::from(CoreError::not_found("book", Uuid::now_v7())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(CoreError::Forbidden("nope".into())),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(CoreError::BadRequest("missing q".into())),
            ApiError::BadRequest(_)
        ));
    }
}
