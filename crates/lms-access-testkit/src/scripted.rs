//! A scriptable access store for exercising coordinator behaviour.
//!
//! Wraps a [`MemoryAccessStore`] and, on every call:
//!
//! 1. records the call;
//! 2. waits at the gate if it is held;
//! 3. sleeps for the configured latency (plus random jitter);
//! 4. fails if a failure was queued for that operation;
//! 5. otherwise delegates to the in-memory store.
//!
//! A queued failure therefore never reaches the inner store, matching a
//! remote that rejected the request before applying it.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::{watch, Notify};

use lms_access_core::{PrincipalId, ResourceId};
use lms_access_store::{AccessStore, MemoryAccessStore, Result, StoreError};

/// Which store method was called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListGrants,
    Grant,
    Revoke,
    RevokeAll,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub principal: PrincipalId,
    pub resource: Option<ResourceId>,
}

/// Recording, failure-injecting, gateable access store.
pub struct ScriptedStore {
    inner: MemoryAccessStore,
    calls: Mutex<Vec<StoreCall>>,
    failures: Mutex<HashMap<StoreOp, VecDeque<StoreError>>>,
    latency: Duration,
    jitter: Duration,
    gate: watch::Sender<bool>,
    entered: AtomicUsize,
    entered_notify: Notify,
}

impl ScriptedStore {
    /// A store with an open gate and no latency.
    pub fn new() -> Self {
        Self::from_inner(MemoryAccessStore::new(), true)
    }

    /// A store whose calls wait at the gate until [`open`](Self::open).
    pub fn gated() -> Self {
        Self::from_inner(MemoryAccessStore::new(), false)
    }

    /// A store pre-populated with grants.
    pub fn with_grants<I>(grants: I) -> Self
    where
        I: IntoIterator<Item = (PrincipalId, ResourceId)>,
    {
        Self::from_inner(MemoryAccessStore::with_grants(grants), true)
    }

    fn from_inner(inner: MemoryAccessStore, open: bool) -> Self {
        let (gate, _) = watch::channel(open);
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            latency: Duration::ZERO,
            jitter: Duration::ZERO,
            gate,
            entered: AtomicUsize::new(0),
            entered_notify: Notify::new(),
        }
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Add a uniformly random delay in `0..=max` to every call.
    pub fn with_jitter(mut self, max: Duration) -> Self {
        self.jitter = max;
        self
    }

    /// Make the next call of `op` fail with `error`. Failures queue up.
    pub fn fail_next(&self, op: StoreOp, error: StoreError) {
        lock(&self.failures)
            .entry(op)
            .or_default()
            .push_back(error);
    }

    /// Hold subsequent calls at the gate.
    pub fn hold(&self) {
        self.gate.send_replace(false);
    }

    /// Let every held and future call through.
    pub fn open(&self) {
        self.gate.send_replace(true);
    }

    /// Wait until at least `count` calls have reached the store.
    pub async fn wait_entered(&self, count: usize) {
        loop {
            // Registered before the check so a concurrent arrival is not missed.
            let notified = self.entered_notify.notified();
            if self.entered.load(Ordering::SeqCst) >= count {
                return;
            }
            notified.await;
        }
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }

    /// Number of calls of `op` received so far.
    pub fn count(&self, op: StoreOp) -> usize {
        lock(&self.calls).iter().filter(|c| c.op == op).count()
    }

    /// The backing in-memory store, bypassing scripting.
    pub fn inner(&self) -> &MemoryAccessStore {
        &self.inner
    }

    async fn enter(
        &self,
        op: StoreOp,
        principal: &PrincipalId,
        resource: Option<&ResourceId>,
    ) -> Result<()> {
        lock(&self.calls).push(StoreCall {
            op,
            principal: principal.clone(),
            resource: resource.cloned(),
        });
        self.entered.fetch_add(1, Ordering::SeqCst);
        self.entered_notify.notify_waiters();

        let mut gate = self.gate.subscribe();
        // The sender lives in `self`, so this cannot observe a closed channel.
        let _ = gate.wait_for(|open| *open).await;

        let delay = self.delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let failure = lock(&self.failures)
            .get_mut(&op)
            .and_then(VecDeque::pop_front);
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.latency;
        }
        let max = self.jitter.as_millis() as u64;
        self.latency + Duration::from_millis(rand::thread_rng().gen_range(0..=max))
    }
}

impl Default for ScriptedStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccessStore for ScriptedStore {
    async fn list_grants(&self, principal: &PrincipalId) -> Result<BTreeSet<ResourceId>> {
        self.enter(StoreOp::ListGrants, principal, None).await?;
        self.inner.list_grants(principal).await
    }

    async fn grant(&self, principal: &PrincipalId, resource: &ResourceId) -> Result<()> {
        self.enter(StoreOp::Grant, principal, Some(resource)).await?;
        self.inner.grant(principal, resource).await
    }

    async fn revoke(&self, principal: &PrincipalId, resource: &ResourceId) -> Result<()> {
        self.enter(StoreOp::Revoke, principal, Some(resource)).await?;
        self.inner.revoke(principal, resource).await
    }

    async fn revoke_all(&self, principal: &PrincipalId) -> Result<()> {
        self.enter(StoreOp::RevokeAll, principal, None).await?;
        self.inner.revoke_all(principal).await
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
