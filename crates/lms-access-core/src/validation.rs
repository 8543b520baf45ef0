//! Identifier validation performed before an operation is admitted.

use crate::error::{Result, ValidationError};
use crate::types::{PrincipalId, ResourceId};

/// Reject a blank principal identifier.
pub fn validate_principal(principal: &PrincipalId) -> Result<()> {
    if principal.is_blank() {
        return Err(ValidationError::MissingPrincipal);
    }
    Ok(())
}

/// Reject a blank resource identifier.
pub fn validate_resource(resource: &ResourceId) -> Result<()> {
    if resource.is_blank() {
        return Err(ValidationError::MissingResource);
    }
    Ok(())
}

/// Validate both halves of a (principal, resource) pair.
///
/// The principal is checked first.
pub fn validate_pair(principal: &PrincipalId, resource: &ResourceId) -> Result<()> {
    validate_principal(principal)?;
    validate_resource(resource)
}
