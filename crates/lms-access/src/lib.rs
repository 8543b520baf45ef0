//! # LMS Access
//!
//! Race-safe management of which administrators (principals) may act on
//! which classes (resources).
//!
//! ## Overview
//!
//! The [`Coordinator`] sits between a presentation layer and an
//! authoritative [`AccessStore`](store::AccessStore):
//!
//! ```text
//! Presentation -> Coordinator -> Access Store (confirm) -> Registry (mutate)
//!      ^                                                        |
//!      +------------------------ snapshot ----------------------+
//! ```
//!
//! - **Fail-fast de-duplication**: a second request for an operation that is
//!   already in flight is rejected, never queued.
//! - **Confirmed state only**: the registry changes only after the store
//!   acknowledges the operation.
//! - **Principal-wide exclusion**: revoke-all holds the whole principal, so
//!   it can never interleave with a single grant or revoke on it.
//! - **Bounded calls**: every store and catalog call carries a timeout.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use lms_access::{Coordinator, CoordinatorConfig};
//! use lms_access::core::{PrincipalId, ResourceId};
//! use lms_access::store::SqliteAccessStore;
//!
//! async fn example() {
//!     let store = SqliteAccessStore::open("access.db").unwrap();
//!     let coordinator = Arc::new(Coordinator::new(
//!         store.clone(),
//!         store,
//!         CoordinatorConfig::default(),
//!     ));
//!
//!     let admin = PrincipalId::from("A1");
//!     coordinator.refresh(&admin).await.unwrap();
//!     coordinator.grant_access(&admin, &ResourceId::from("C1")).await.unwrap();
//!
//!     assert!(coordinator.snapshot(&admin).contains(&ResourceId::from("C1")));
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `lms_access::core` - Identifiers, operation keys, validation
//! - `lms_access::store` - Collaborator traits and reference stores
//! - `lms_access::registry` - The confirmed-grant cache

pub mod adapter;
pub mod api;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod inflight;

pub use lms_access_core as core;
pub use lms_access_registry as registry;
pub use lms_access_store as store;

pub use api::{AccessApi, OperationResponse, SnapshotResponse, Status};
pub use config::CoordinatorConfig;
pub use coordinator::Coordinator;
pub use error::{AccessError, RemoteError, Result, StatusCode};

pub use lms_access_core::{OperationKey, Principal, PrincipalId, Resource, ResourceId, Verb};
