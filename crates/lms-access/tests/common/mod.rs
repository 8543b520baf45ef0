//! Shared setup for the integration suites.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use lms_access::store::MemoryCatalog;
use lms_access::{Coordinator, CoordinatorConfig};
use lms_access_testkit::{sample_catalog, ScriptedStore};

pub type TestCoordinator = Coordinator<Arc<ScriptedStore>, MemoryCatalog>;

/// Route coordinator logs through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A coordinator over `store` and the sample catalog.
pub fn coordinator(store: &Arc<ScriptedStore>) -> Arc<TestCoordinator> {
    coordinator_with(store, CoordinatorConfig::default())
}

pub fn coordinator_with(
    store: &Arc<ScriptedStore>,
    config: CoordinatorConfig,
) -> Arc<TestCoordinator> {
    init_tracing();
    Arc::new(Coordinator::new(
        Arc::clone(store),
        MemoryCatalog::new(sample_catalog()),
        config,
    ))
}

/// Short timeouts for tests that run on paused time.
pub fn fast_config() -> CoordinatorConfig {
    CoordinatorConfig::default()
        .with_store_timeout(Duration::from_millis(100))
        .with_catalog_timeout(Duration::from_millis(100))
}
