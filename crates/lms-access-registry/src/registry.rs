//! Grant registry: the confirmed-state cache.
//!
//! Every method takes the lock for the duration of one in-memory update and
//! releases it before returning, so the registry is safe to call from async
//! code without holding a guard across an await point.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use lms_access_core::{PrincipalId, ResourceId};

/// Per-principal sets of confirmed grants.
///
/// Principals with no confirmed grants have no entry; a snapshot of such a
/// principal is the empty set.
#[derive(Debug, Default)]
pub struct GrantRegistry {
    grants: Mutex<HashMap<PrincipalId, BTreeSet<ResourceId>>>,
}

/// Point-in-time copy of the whole registry, ordered for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryView {
    pub principals: BTreeMap<PrincipalId, BTreeSet<ResourceId>>,
}

impl GrantRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The resources currently known to be granted to `principal`.
    pub fn snapshot(&self, principal: &PrincipalId) -> BTreeSet<ResourceId> {
        self.lock().get(principal).cloned().unwrap_or_default()
    }

    /// Whether `resource` is currently known to be granted to `principal`.
    pub fn contains(&self, principal: &PrincipalId, resource: &ResourceId) -> bool {
        self.lock()
            .get(principal)
            .is_some_and(|set| set.contains(resource))
    }

    /// Add (`added = true`) or remove one resource from a principal's set.
    ///
    /// Idempotent. Returns whether the set changed.
    pub fn apply(&self, principal: &PrincipalId, resource: &ResourceId, added: bool) -> bool {
        let mut grants = self.lock();

        if added {
            return grants
                .entry(principal.clone())
                .or_default()
                .insert(resource.clone());
        }

        let Some(set) = grants.get_mut(principal) else {
            return false;
        };
        let removed = set.remove(resource);
        if set.is_empty() {
            grants.remove(principal);
        }
        removed
    }

    /// Empty the set for `principal`. Returns how many grants were dropped.
    pub fn clear(&self, principal: &PrincipalId) -> usize {
        self.lock()
            .remove(principal)
            .map(|set| set.len())
            .unwrap_or(0)
    }

    /// Install a freshly listed set for `principal`, replacing whatever was cached.
    pub fn replace(&self, principal: &PrincipalId, resources: BTreeSet<ResourceId>) {
        let mut grants = self.lock();
        if resources.is_empty() {
            grants.remove(principal);
        } else {
            grants.insert(principal.clone(), resources);
        }
    }

    /// Principals with at least one cached grant, in sorted order.
    pub fn principals(&self) -> Vec<PrincipalId> {
        let mut principals: Vec<PrincipalId> = self.lock().keys().cloned().collect();
        principals.sort();
        principals
    }

    /// Copy the whole registry.
    pub fn view(&self) -> RegistryView {
        let grants = self.lock();
        RegistryView {
            principals: grants
                .iter()
                .map(|(p, set)| (p.clone(), set.clone()))
                .collect(),
        }
    }

    // A panic while holding the lock cannot leave a set half-updated: every
    // mutation is a single BTreeSet/HashMap call. Recover the guard.
    fn lock(&self) -> MutexGuard<'_, HashMap<PrincipalId, BTreeSet<ResourceId>>> {
        self.grants.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
