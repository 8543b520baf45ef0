//! # LMS Access Store
//!
//! Collaborator seams for access-grant management. The coordinator never
//! talks to a database or an HTTP endpoint directly; it consumes the
//! [`AccessStore`] and [`ResourceCatalog`] traits defined here.
//!
//! ## Key Types
//!
//! - [`AccessStore`] - Authoritative, fallible source of truth for grants
//! - [`ResourceCatalog`] - Read-only listing of grantable resources
//! - [`MemoryAccessStore`] / [`MemoryCatalog`] - In-memory implementations
//! - [`SqliteAccessStore`] - SQLite-backed implementation of both traits
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lms_access_store::{AccessStore, SqliteAccessStore};
//! use lms_access_core::{PrincipalId, ResourceId};
//!
//! async fn example() {
//!     let store = SqliteAccessStore::open("access.db").unwrap();
//!
//!     let admin = PrincipalId::from("A1");
//!     store.grant(&admin, &ResourceId::from("C1")).await.unwrap();
//!
//!     let granted = store.list_grants(&admin).await.unwrap();
//!     assert_eq!(granted.len(), 1);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Idempotent mutations**: granting twice, or revoking something that
//!   is not granted, succeeds. Clients rely on this to retry after timeouts.
//! - **No business rules**: conflict and not-found checks belong to the
//!   coordinator, which validates against its confirmed cache.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::{MemoryAccessStore, MemoryCatalog};
pub use sqlite::SqliteAccessStore;
pub use traits::{AccessStore, ResourceCatalog};
