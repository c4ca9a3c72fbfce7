//! Ownership checks applied by the HTTP layer before mutating calls.

use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Decides whether an acting user may mutate a resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationChecker;

impl AuthorizationChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn is_owner(&self, acting_user_id: Uuid, resource_owner_id: Uuid) -> bool {
        acting_user_id == resource_owner_id
    }

    /// Fails with [`DomainError::Forbidden`] unless the acting user owns the resource.
    pub fn check_ownership(&self, acting_user_id: Uuid, resource_owner_id: Uuid) -> DomainResult<()> {
        if self.is_owner(acting_user_id, resource_owner_id) {
            return Ok(());
        }

        tracing::warn!(
            acting_user_id = %acting_user_id,
            owner_id = %resource_owner_id,
            "Ownership check denied"
        );
        Err(DomainError::Forbidden {
            acting_user_id,
            owner_id: resource_owner_id,
        })
    }
}
