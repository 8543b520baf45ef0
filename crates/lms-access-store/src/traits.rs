//! Collaborator traits: the abstract interface to the grant system of record.
//!
//! These traits allow the coordinator to be transport-agnostic. An HTTP
//! client, an RPC stub, or the bundled SQLite and in-memory stores can all
//! stand behind them.

use std::collections::BTreeSet;

use async_trait::async_trait;
use lms_access_core::{PrincipalId, Resource, ResourceId};

use crate::error::Result;

/// The authoritative store of grants.
///
/// Calls may be slow and may fail. Every mutating call must be idempotent:
/// repeating a `grant` or `revoke` that already took effect succeeds
/// without changing anything.
#[async_trait]
pub trait AccessStore: Send + Sync {
    /// List the resources currently granted to a principal.
    ///
    /// A principal with no grants yields an empty set, not an error.
    async fn list_grants(&self, principal: &PrincipalId) -> Result<BTreeSet<ResourceId>>;

    /// Grant a resource to a principal.
    async fn grant(&self, principal: &PrincipalId, resource: &ResourceId) -> Result<()>;

    /// Revoke a resource from a principal.
    async fn revoke(&self, principal: &PrincipalId, resource: &ResourceId) -> Result<()>;

    /// Revoke every resource from a principal in one step.
    ///
    /// Implementations must be all-or-nothing: on error, no grant of the
    /// principal may have been removed.
    async fn revoke_all(&self, principal: &PrincipalId) -> Result<()>;
}

/// Read-only listing of grantable resources.
#[async_trait]
pub trait ResourceCatalog: Send + Sync {
    /// List every grantable resource, in display order.
    async fn list_resources(&self) -> Result<Vec<Resource>>;
}

#[async_trait]
impl<T: AccessStore + ?Sized> AccessStore for std::sync::Arc<T> {
    async fn list_grants(&self, principal: &PrincipalId) -> Result<BTreeSet<ResourceId>> {
        (**self).list_grants(principal).await
    }

    async fn grant(&self, principal: &PrincipalId, resource: &ResourceId) -> Result<()> {
        (**self).grant(principal, resource).await
    }

    async fn revoke(&self, principal: &PrincipalId, resource: &ResourceId) -> Result<()> {
        (**self).revoke(principal, resource).await
    }

    async fn revoke_all(&self, principal: &PrincipalId) -> Result<()> {
        (**self).revoke_all(principal).await
    }
}

#[async_trait]
impl<T: ResourceCatalog + ?Sized> ResourceCatalog for std::sync::Arc<T> {
    async fn list_resources(&self) -> Result<Vec<Resource>> {
        (**self).list_resources().await
    }
}
