//! Client adapters for the collaborators.
//!
//! Thin pass-throughs that bound every call with a timeout and map failures
//! into [`RemoteError`]. No business rules live here.

use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;

use lms_access_core::{PrincipalId, Resource, ResourceId};
use lms_access_store::{AccessStore, ResourceCatalog};

use crate::error::RemoteError;

/// Await `call`, giving up after `after`.
async fn bounded<T, F>(operation: &'static str, after: Duration, call: F) -> Result<T, RemoteError>
where
    F: Future<Output = lms_access_store::Result<T>>,
{
    match tokio::time::timeout(after, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err(RemoteError::Store { operation, source }),
        Err(_) => Err(RemoteError::Timeout { operation, after }),
    }
}

/// Timed client for an [`AccessStore`].
#[derive(Debug)]
pub struct StoreClient<S> {
    store: S,
    timeout: Duration,
}

impl<S: AccessStore> StoreClient<S> {
    pub fn new(store: S, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    pub async fn list_grants(
        &self,
        principal: &PrincipalId,
    ) -> Result<BTreeSet<ResourceId>, RemoteError> {
        bounded("list_grants", self.timeout, self.store.list_grants(principal)).await
    }

    pub async fn grant(
        &self,
        principal: &PrincipalId,
        resource: &ResourceId,
    ) -> Result<(), RemoteError> {
        bounded("grant", self.timeout, self.store.grant(principal, resource)).await
    }

    pub async fn revoke(
        &self,
        principal: &PrincipalId,
        resource: &ResourceId,
    ) -> Result<(), RemoteError> {
        bounded("revoke", self.timeout, self.store.revoke(principal, resource)).await
    }

    pub async fn revoke_all(&self, principal: &PrincipalId) -> Result<(), RemoteError> {
        bounded("revoke_all", self.timeout, self.store.revoke_all(principal)).await
    }
}

/// Timed client for a [`ResourceCatalog`].
#[derive(Debug)]
pub struct CatalogClient<C> {
    catalog: C,
    timeout: Duration,
}

impl<C: ResourceCatalog> CatalogClient<C> {
    pub fn new(catalog: C, timeout: Duration) -> Self {
        Self { catalog, timeout }
    }

    /// The wrapped catalog.
    pub fn inner(&self) -> &C {
        &self.catalog
    }

    pub async fn list_resources(&self) -> Result<Vec<Resource>, RemoteError> {
        bounded("list_resources", self.timeout, self.catalog.list_resources()).await
    }
}
