//! In-flight operation tracking.
//!
//! A claim is taken before an operation calls the access store and released
//! when its [`Claim`] guard drops, whether the operation succeeded, failed,
//! timed out, or its future was dropped mid-await.
//!
//! Exclusion rules:
//! - a key can be claimed once at a time;
//! - a principal-wide key (revoke-all, refresh) can only be claimed when
//!   nothing else is in flight for that principal, and while held it blocks
//!   every other claim on that principal.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use lms_access_core::{OperationKey, PrincipalId};

/// Concurrent set of claimed operation keys.
#[derive(Debug, Default)]
pub struct InflightTracker {
    state: Mutex<InflightState>,
}

#[derive(Debug, Default)]
struct InflightState {
    keys: HashSet<OperationKey>,
    /// Number of claims held per principal, principal-wide ones included.
    per_principal: HashMap<PrincipalId, usize>,
    /// Principals currently held by a principal-wide claim.
    exclusive: HashSet<PrincipalId>,
}

impl InflightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically test-and-set `key`.
    ///
    /// Returns `None` when the key, or its principal, is already held.
    pub fn try_claim(&self, key: OperationKey) -> Option<Claim<'_>> {
        let mut state = self.lock();
        let principal = key.principal().clone();

        if state.exclusive.contains(&principal) || state.keys.contains(&key) {
            return None;
        }
        let held = state.per_principal.get(&principal).copied().unwrap_or(0);
        if key.is_principal_wide() && held > 0 {
            return None;
        }

        if key.is_principal_wide() {
            state.exclusive.insert(principal.clone());
        }
        state.keys.insert(key.clone());
        *state.per_principal.entry(principal).or_default() += 1;

        Some(Claim { tracker: self, key })
    }

    /// Whether `key` is currently claimed.
    pub fn is_claimed(&self, key: &OperationKey) -> bool {
        self.lock().keys.contains(key)
    }

    /// Snapshot of the claimed keys.
    pub fn keys(&self) -> Vec<OperationKey> {
        self.lock().keys.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, key: &OperationKey) {
        let mut state = self.lock();
        if !state.keys.remove(key) {
            return;
        }

        let principal = key.principal();
        if key.is_principal_wide() {
            state.exclusive.remove(principal);
        }
        if let Some(count) = state.per_principal.get_mut(principal) {
            *count -= 1;
            if *count == 0 {
                state.per_principal.remove(principal);
            }
        }
    }

    // Every mutation under this lock is completed before the guard drops,
    // so a poisoned lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, InflightState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A held claim. Dropping it releases the key.
#[derive(Debug)]
pub struct Claim<'a> {
    tracker: &'a InflightTracker,
    key: OperationKey,
}

impl Claim<'_> {
    pub fn key(&self) -> &OperationKey {
        &self.key
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.tracker.release(&self.key);
        tracing::debug!(key = %self.key, "released operation claim");
    }
}
