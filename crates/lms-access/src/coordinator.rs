//! The Coordinator: race-safe grant management over an authoritative store.
//!
//! Every mutating operation follows the same shape:
//!
//! 1. validate identifiers;
//! 2. claim its [`OperationKey`], failing fast if it is already held;
//! 3. check the precondition against the confirmed registry;
//! 4. call the access store under a timeout;
//! 5. on confirmation, and only then, update the registry.
//!
//! The claim is released when the operation returns (or its future is
//! dropped), so a failed or timed-out attempt can be retried at once.

use std::collections::BTreeSet;

use lms_access_core::{
    validate_pair, validate_principal, OperationKey, PrincipalId, Resource, ResourceId,
    ValidationError,
};
use lms_access_registry::{GrantRegistry, RegistryView};
use lms_access_store::{AccessStore, ResourceCatalog};

use crate::adapter::{CatalogClient, StoreClient};
use crate::config::CoordinatorConfig;
use crate::error::{AccessError, Result};
use crate::inflight::{Claim, InflightTracker};

/// Orchestrates grant, revoke and revoke-all against the access store.
///
/// Owns the registry and the in-flight tracker; share it behind an `Arc`.
pub struct Coordinator<S, C> {
    store: StoreClient<S>,
    catalog: CatalogClient<C>,
    registry: GrantRegistry,
    inflight: InflightTracker,
    config: CoordinatorConfig,
}

impl<S: AccessStore, C: ResourceCatalog> Coordinator<S, C> {
    /// Create a coordinator with an empty registry.
    ///
    /// Call [`refresh`](Self::refresh) or [`seed`](Self::seed) to load
    /// existing grants from the store.
    pub fn new(store: S, catalog: C, config: CoordinatorConfig) -> Self {
        Self {
            store: StoreClient::new(store, config.store_timeout),
            catalog: CatalogClient::new(catalog, config.catalog_timeout),
            registry: GrantRegistry::new(),
            inflight: InflightTracker::new(),
            config,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// The wrapped access store.
    pub fn store(&self) -> &S {
        self.store.inner()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Confirmed grants of `principal`. Never blocks on I/O.
    pub fn snapshot(&self, principal: &PrincipalId) -> BTreeSet<ResourceId> {
        self.registry.snapshot(principal)
    }

    /// Confirmed grants of every cached principal.
    pub fn view(&self) -> RegistryView {
        self.registry.view()
    }

    /// Keys of the operations currently in flight.
    pub fn in_flight(&self) -> Vec<OperationKey> {
        self.inflight.keys()
    }

    /// Whether `key` is currently in flight.
    pub fn is_in_flight(&self, key: &OperationKey) -> bool {
        self.inflight.is_claimed(key)
    }

    /// Every grantable resource, as listed by the catalog.
    pub async fn resources(&self) -> Result<Vec<Resource>> {
        Ok(self.catalog.list_resources().await?)
    }

    /// Catalog resources not yet granted to `principal`, in catalog order.
    pub async fn available_resources(&self, principal: &PrincipalId) -> Result<Vec<Resource>> {
        validate_principal(principal)?;

        let resources = self.catalog.list_resources().await?;
        let granted = self.registry.snapshot(principal);

        Ok(resources
            .into_iter()
            .filter(|resource| !granted.contains(&resource.id))
            .collect())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Grant `resource` to `principal`.
    ///
    /// Fails with a conflict if the registry already holds the grant.
    pub async fn grant_access(&self, principal: &PrincipalId, resource: &ResourceId) -> Result<()> {
        validate_pair(principal, resource)?;
        let _claim = self.claim(OperationKey::grant(principal.clone(), resource.clone()))?;

        if self.registry.contains(principal, resource) {
            return Err(ValidationError::Conflict {
                principal: principal.clone(),
                resource: resource.clone(),
            }
            .into());
        }

        if let Err(e) = self.store.grant(principal, resource).await {
            tracing::warn!(principal = %principal, resource = %resource, error = %e, "grant failed");
            return Err(e.into());
        }

        self.registry.apply(principal, resource, true);
        tracing::info!(principal = %principal, resource = %resource, "access granted");
        Ok(())
    }

    /// Revoke `resource` from `principal`.
    ///
    /// Fails with not-found if the registry does not hold the grant.
    pub async fn revoke_access(
        &self,
        principal: &PrincipalId,
        resource: &ResourceId,
    ) -> Result<()> {
        validate_pair(principal, resource)?;
        let _claim = self.claim(OperationKey::revoke(principal.clone(), resource.clone()))?;

        if !self.registry.contains(principal, resource) {
            return Err(ValidationError::NotFound {
                principal: principal.clone(),
                resource: resource.clone(),
            }
            .into());
        }

        if let Err(e) = self.store.revoke(principal, resource).await {
            tracing::warn!(principal = %principal, resource = %resource, error = %e, "revoke failed");
            return Err(e.into());
        }

        self.registry.apply(principal, resource, false);
        tracing::info!(principal = %principal, resource = %resource, "access revoked");
        Ok(())
    }

    /// Revoke every resource from `principal`.
    ///
    /// Holds the whole principal while pending: no grant or revoke on the
    /// same principal is admitted until it resolves. The registry is either
    /// cleared or left exactly as it was.
    pub async fn revoke_all(&self, principal: &PrincipalId) -> Result<()> {
        validate_principal(principal)?;
        let _claim = self.claim(OperationKey::revoke_all(principal.clone()))?;

        if let Err(e) = self.store.revoke_all(principal).await {
            tracing::warn!(principal = %principal, error = %e, "revoke_all failed");
            return Err(e.into());
        }

        let cleared = self.registry.clear(principal);
        tracing::info!(principal = %principal, cleared, "all access revoked");
        Ok(())
    }

    /// Reload `principal`'s grants from the access store.
    ///
    /// Holds the whole principal while pending so that a listing taken
    /// before a concurrent grant confirms cannot overwrite it.
    pub async fn refresh(&self, principal: &PrincipalId) -> Result<BTreeSet<ResourceId>> {
        validate_principal(principal)?;
        let _claim = self.claim(OperationKey::refresh(principal.clone()))?;

        let listed = match self.store.list_grants(principal).await {
            Ok(listed) => listed,
            Err(e) => {
                tracing::warn!(principal = %principal, error = %e, "refresh failed");
                return Err(e.into());
            }
        };

        self.registry.replace(principal, listed.clone());
        tracing::debug!(principal = %principal, grants = listed.len(), "registry refreshed");
        Ok(listed)
    }

    /// Refresh each principal in turn, stopping at the first failure.
    pub async fn seed<'a, I>(&self, principals: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a PrincipalId>,
    {
        for principal in principals {
            self.refresh(principal).await?;
        }
        Ok(())
    }

    fn claim(&self, key: OperationKey) -> Result<Claim<'_>> {
        match self.inflight.try_claim(key.clone()) {
            Some(claim) => {
                tracing::debug!(key = %key, "claimed operation");
                Ok(claim)
            }
            None => {
                tracing::debug!(key = %key, "rejected concurrent operation");
                Err(AccessError::ConcurrentOperation(key))
            }
        }
    }
}
