//! Authenticated-identity extraction.
//!
//! Session handling and token issuance live outside this service; an
//! upstream gateway forwards the verified user id in a header. The core
//! only ever sees "current user id or absent".

use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use uuid::Uuid;

/// Header carrying the verified user id, set by the auth gateway.
pub const IDENTITY_HEADER: &str = "x-user-id";

/// The current user identity, if any. Absent or malformed header means
/// an anonymous caller; authorization decisions happen in the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity(pub Option<Uuid>);

impl Identity {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(IDENTITY_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| Uuid::parse_str(raw).ok());
        Ok(Identity(user_id))
    }
}
