//! # LMS Access Testkit
//!
//! Testing utilities for the access coordinator.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a sample catalog and admin directory
//! - **Scripted store**: an [`AccessStore`](lms_access_store::AccessStore)
//!   that records calls, injects failures, adds latency, and can hold calls
//!   at a gate so tests can observe an operation while it is in flight
//! - **Generators**: proptest strategies for identifiers and operation scripts
//!
//! ## Holding an operation in flight
//!
//! ```rust,ignore
//! let store = Arc::new(ScriptedStore::gated());
//! let coordinator = Arc::new(Coordinator::new(store.clone(), catalog, config));
//!
//! let pending = tokio::spawn({
//!     let c = coordinator.clone();
//!     async move { c.grant_access(&a1, &c1).await }
//! });
//! store.wait_entered(1).await;   // the grant now holds its claim
//!
//! // ... issue competing operations ...
//!
//! store.open();                  // let everything through
//! pending.await.unwrap().unwrap();
//! ```

pub mod fixtures;
pub mod generators;
pub mod scripted;

pub use fixtures::{admin, class, sample_admins, sample_catalog};
pub use generators::{Op, OpScript};
pub use scripted::{ScriptedStore, StoreCall, StoreOp};
