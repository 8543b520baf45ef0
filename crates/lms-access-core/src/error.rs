//! Error types for the access core.

use thiserror::Error;

use crate::types::{PrincipalId, ResourceId};

/// Rejections raised before any remote call is made.
///
/// None of these ever mutate cached state. The caller should refresh what
/// it displays rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no principal supplied")]
    MissingPrincipal,

    #[error("no resource supplied")]
    MissingResource,

    /// The resource is already granted to the principal.
    #[error("resource {resource} is already granted to {principal}")]
    Conflict {
        principal: PrincipalId,
        resource: ResourceId,
    },

    /// The resource is not granted to the principal, so there is nothing to revoke.
    #[error("resource {resource} is not granted to {principal}")]
    NotFound {
        principal: PrincipalId,
        resource: ResourceId,
    },
}

impl ValidationError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ValidationError::Conflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ValidationError::NotFound { .. })
    }
}

/// Result type for core validation.
pub type Result<T> = std::result::Result<T, ValidationError>;
