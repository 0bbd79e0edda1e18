//! JSON response envelope shared by every endpoint:
//! `{success, data, count?, pagination?}`.

use serde::Serialize;

/// Successful response body. Failures are produced by
/// [`crate::error::ApiError`] instead.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    /// Envelope around a single entity.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            count: None,
            pagination: None,
            data,
        }
    }

    /// Envelope around a list, carrying the page item count.
    pub fn list(data: T, count: usize) -> Self {
        Self {
            success: true,
            count: Some(count),
            pagination: None,
            data,
        }
    }

    /// Envelope around a paginated list.
    pub fn page(data: T, count: usize, pagination: Pagination) -> Self {
        Self {
            success: true,
            count: Some(count),
            pagination: Some(pagination),
            data,
        }
    }
}

/// Adjacent-page links for list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRef {
    pub page: u64,
    pub limit: u64,
}
