//! Error types for the coordinator.

use std::time::Duration;

use lms_access_core::{OperationKey, ValidationError};
use lms_access_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// A collaborator call failed or did not answer in time.
///
/// Cached state is never changed when one of these is returned; the caller
/// may retry.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The call did not complete within the configured timeout.
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// The collaborator answered with an error.
    #[error("{operation} failed: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

impl RemoteError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RemoteError::Timeout { .. })
    }
}

/// Errors returned by coordinator operations.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Rejected before any remote call.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An operation with the same key, or a principal-wide operation on
    /// the same principal, is already in flight.
    #[error("operation already in flight: {0}")]
    ConcurrentOperation(OperationKey),

    /// The access store or catalog failed.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),
}

impl AccessError {
    /// The status code reported on the operation surface.
    pub fn code(&self) -> StatusCode {
        match self {
            AccessError::Validation(_) => StatusCode::Validation,
            AccessError::ConcurrentOperation(_) => StatusCode::ConcurrentOperation,
            AccessError::Remote(_) => StatusCode::Remote,
        }
    }

    /// Whether retrying the same request later can succeed.
    ///
    /// Validation failures need a refreshed view instead.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, AccessError::Validation(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AccessError::Validation(e) if e.is_conflict())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AccessError::Validation(e) if e.is_not_found())
    }

    pub fn is_concurrent(&self) -> bool {
        matches!(self, AccessError::ConcurrentOperation(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, AccessError::Remote(e) if e.is_timeout())
    }
}

/// Numeric outcome codes of the operation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
#[repr(u8)]
pub enum StatusCode {
    Ok = 0,
    Validation = 1,
    ConcurrentOperation = 2,
    Remote = 3,
}

impl StatusCode {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<StatusCode> for u8 {
    fn from(code: StatusCode) -> Self {
        code.as_u8()
    }
}

/// Result type for coordinator operations.
pub type Result<T> = std::result::Result<T, AccessError>;

#[cfg(test)]
mod tests {
    use super::*;
    use lms_access_core::{PrincipalId, ResourceId};

    #[test]
    fn test_codes() {
        let conflict = AccessError::from(ValidationError::Conflict {
            principal: PrincipalId::from("A1"),
            resource: ResourceId::from("C1"),
        });
        assert_eq!(conflict.code(), StatusCode::Validation);
        assert!(conflict.is_conflict());
        assert!(!conflict.is_retryable());

        let busy = AccessError::ConcurrentOperation(OperationKey::revoke_all(PrincipalId::from("A1")));
        assert_eq!(busy.code().as_u8(), 2);
        assert!(busy.is_retryable());

        let timeout = AccessError::from(RemoteError::Timeout {
            operation: "grant",
            after: Duration::from_millis(50),
        });
        assert_eq!(timeout.code().as_u8(), 3);
        assert!(timeout.is_timeout());
        assert!(timeout.is_retryable());
    }

    #[test]
    fn test_remote_error_keeps_source() {
        let err = RemoteError::Store {
            operation: "revoke",
            source: StoreError::Unavailable("connection refused".into()),
        };
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("store unavailable: connection refused"));
        assert_eq!(
            err.to_string(),
            "revoke failed: store unavailable: connection refused"
        );
    }
}
