//! Operation keys: the identity of a mutating operation.
//!
//! Two requests with the same [`OperationKey`] are duplicates of each other.
//! Principal-wide verbs carry no resource (the wildcard) and conflict with
//! every other operation on the same principal.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{PrincipalId, ResourceId};

/// The kind of operation being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    /// Grant one resource to a principal.
    Grant,
    /// Revoke one resource from a principal.
    Revoke,
    /// Revoke every resource from a principal.
    RevokeAll,
    /// Reload a principal's grants from the access store.
    Refresh,
}

impl Verb {
    /// Whether this verb covers every resource of a principal.
    pub const fn is_principal_wide(self) -> bool {
        matches!(self, Verb::RevokeAll | Verb::Refresh)
    }

    /// Stable lowercase name, used in logs and error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Verb::Grant => "grant",
            Verb::Revoke => "revoke",
            Verb::RevokeAll => "revoke_all",
            Verb::Refresh => "refresh",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of an in-flight mutating operation.
///
/// `resource` is `None` exactly when `verb` is principal-wide; the
/// constructors are the only way to build a key, which keeps that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationKey {
    principal: PrincipalId,
    resource: Option<ResourceId>,
    verb: Verb,
}

impl OperationKey {
    /// Key for granting `resource` to `principal`.
    pub fn grant(principal: PrincipalId, resource: ResourceId) -> Self {
        Self {
            principal,
            resource: Some(resource),
            verb: Verb::Grant,
        }
    }

    /// Key for revoking `resource` from `principal`.
    pub fn revoke(principal: PrincipalId, resource: ResourceId) -> Self {
        Self {
            principal,
            resource: Some(resource),
            verb: Verb::Revoke,
        }
    }

    /// Key for revoking everything from `principal`.
    pub fn revoke_all(principal: PrincipalId) -> Self {
        Self {
            principal,
            resource: None,
            verb: Verb::RevokeAll,
        }
    }

    /// Key for reloading `principal` from the access store.
    pub fn refresh(principal: PrincipalId) -> Self {
        Self {
            principal,
            resource: None,
            verb: Verb::Refresh,
        }
    }

    pub fn principal(&self) -> &PrincipalId {
        &self.principal
    }

    /// The targeted resource, or `None` for the wildcard.
    pub fn resource(&self) -> Option<&ResourceId> {
        self.resource.as_ref()
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Whether this key excludes every other operation on its principal.
    pub fn is_principal_wide(&self) -> bool {
        self.verb.is_principal_wide()
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource {
            Some(resource) => write!(f, "{}({}, {})", self.verb, self.principal, resource),
            None => write!(f, "{}({}, *)", self.verb, self.principal),
        }
    }
}
