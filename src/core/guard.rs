//! Ownership-based authorization for mutating operations.
//!
//! Check order is fixed: [`require_identity`] runs before any store
//! lookup, the caller's existence check follows, and [`require_owner`]
//! runs last. Ownership can never be evaluated on a missing resource.

use uuid::Uuid;

use crate::core::error::CoreError;

/// Refuse anonymous callers before touching the store.
pub fn require_identity(identity: Option<Uuid>) -> Result<Uuid, CoreError> {
    identity.ok_or_else(|| CoreError::Unauthenticated("authentication required".to_string()))
}

/// Refuse authenticated callers who do not own the resource.
pub fn require_owner(user: Uuid, owner: Uuid, action: &str) -> Result<(), CoreError> {
    if user == owner {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!("not authorized to {action}")))
    }
}
