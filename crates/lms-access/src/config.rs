//! Coordinator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default timeout for access store calls.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for resource catalog calls.
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the [`Coordinator`](crate::Coordinator).
///
/// Durations are (de)serialized as integer milliseconds, so the struct can
/// be embedded in a service's own config file:
///
/// ```json
/// { "store_timeout_ms": 2500, "catalog_timeout_ms": 5000 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Upper bound on a single access store call.
    #[serde(rename = "store_timeout_ms", with = "duration_millis")]
    pub store_timeout: Duration,
    /// Upper bound on a single catalog call.
    #[serde(rename = "catalog_timeout_ms", with = "duration_millis")]
    pub catalog_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            store_timeout: DEFAULT_STORE_TIMEOUT,
            catalog_timeout: DEFAULT_CATALOG_TIMEOUT,
        }
    }
}

impl CoordinatorConfig {
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn with_catalog_timeout(mut self, timeout: Duration) -> Self {
        self.catalog_timeout = timeout;
        self
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
