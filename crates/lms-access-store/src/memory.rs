//! In-memory implementations of the collaborator traits.
//!
//! These have the same semantics as the SQLite store but keep everything
//! in memory with no persistence. Useful for tests and for embedding the
//! coordinator in front of a store that is synced by other means.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use lms_access_core::{PrincipalId, Resource, ResourceId};

use crate::error::{Result, StoreError};
use crate::traits::{AccessStore, ResourceCatalog};

/// In-memory access store.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryAccessStore {
    grants: RwLock<HashMap<PrincipalId, BTreeSet<ResourceId>>>,
}

impl MemoryAccessStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with grants.
    pub fn with_grants<I>(grants: I) -> Self
    where
        I: IntoIterator<Item = (PrincipalId, ResourceId)>,
    {
        let mut map: HashMap<PrincipalId, BTreeSet<ResourceId>> = HashMap::new();
        for (principal, resource) in grants {
            map.entry(principal).or_default().insert(resource);
        }
        Self {
            grants: RwLock::new(map),
        }
    }

    /// Total number of grants across all principals.
    pub fn grant_count(&self) -> Result<usize> {
        let grants = self.grants.read().map_err(poisoned)?;
        Ok(grants.values().map(BTreeSet::len).sum())
    }
}

#[async_trait]
impl AccessStore for MemoryAccessStore {
    async fn list_grants(&self, principal: &PrincipalId) -> Result<BTreeSet<ResourceId>> {
        let grants = self.grants.read().map_err(poisoned)?;
        Ok(grants.get(principal).cloned().unwrap_or_default())
    }

    async fn grant(&self, principal: &PrincipalId, resource: &ResourceId) -> Result<()> {
        let mut grants = self.grants.write().map_err(poisoned)?;
        grants
            .entry(principal.clone())
            .or_default()
            .insert(resource.clone());
        Ok(())
    }

    async fn revoke(&self, principal: &PrincipalId, resource: &ResourceId) -> Result<()> {
        let mut grants = self.grants.write().map_err(poisoned)?;
        if let Some(set) = grants.get_mut(principal) {
            set.remove(resource);
            if set.is_empty() {
                grants.remove(principal);
            }
        }
        Ok(())
    }

    async fn revoke_all(&self, principal: &PrincipalId) -> Result<()> {
        let mut grants = self.grants.write().map_err(poisoned)?;
        grants.remove(principal);
        Ok(())
    }
}

/// In-memory resource catalog with a fixed listing.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    resources: Vec<Resource>,
}

impl MemoryCatalog {
    /// Create a catalog that lists `resources` in the given order.
    pub fn new(resources: Vec<Resource>) -> Self {
        Self { resources }
    }
}

#[async_trait]
impl ResourceCatalog for MemoryCatalog {
    async fn list_resources(&self) -> Result<Vec<Resource>> {
        Ok(self.resources.clone())
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Unavailable(format!("lock poisoned: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_grant_and_list() {
        let store = MemoryAccessStore::new();
        let admin = PrincipalId::from("A1");

        store.grant(&admin, &ResourceId::from("C1")).await.unwrap();
        store.grant(&admin, &ResourceId::from("C2")).await.unwrap();

        let listed = store.list_grants(&admin).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.contains(&ResourceId::from("C1")));
    }

    #[tokio::test]
    async fn test_memory_store_idempotent() {
        let store = MemoryAccessStore::new();
        let admin = PrincipalId::from("A1");
        let class = ResourceId::from("C1");

        store.grant(&admin, &class).await.unwrap();
        store.grant(&admin, &class).await.unwrap();
        assert_eq!(store.grant_count().unwrap(), 1);

        store.revoke(&admin, &class).await.unwrap();
        store.revoke(&admin, &class).await.unwrap();
        assert_eq!(store.grant_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_memory_store_revoke_all_is_scoped() {
        let store = MemoryAccessStore::with_grants([
            (PrincipalId::from("A1"), ResourceId::from("C1")),
            (PrincipalId::from("A1"), ResourceId::from("C2")),
            (PrincipalId::from("A2"), ResourceId::from("C1")),
        ]);

        store.revoke_all(&PrincipalId::from("A1")).await.unwrap();

        assert!(store
            .list_grants(&PrincipalId::from("A1"))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            store.list_grants(&PrincipalId::from("A2")).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_memory_catalog_preserves_order() {
        let catalog = MemoryCatalog::new(vec![
            Resource::new("C2", "MA201", "Linear Algebra", "Dr. Okafor"),
            Resource::new("C1", "CS101", "Intro to CS", "Dr. Reyes"),
        ]);

        let listed = catalog.list_resources().await.unwrap();
        assert_eq!(listed[0].id, ResourceId::from("C2"));
        assert_eq!(listed[1].code, "CS101");
    }
}
