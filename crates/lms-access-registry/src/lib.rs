//! # LMS Access Registry
//!
//! The in-process cache of confirmed grants.
//!
//! ## Overview
//!
//! The registry maps each principal to the set of resources the access
//! store has confirmed as granted. It is a rebuildable cache: the store is
//! the system of record, and the registry is seeded from `list_grants`.
//!
//! ## Key Concepts
//!
//! - **Confirmed only**: callers mutate the registry only after the store
//!   has acknowledged the matching operation. There are no optimistic writes.
//! - **Set semantics**: a grant appears at most once per principal.
//! - **Linearizable**: every read and update goes through a single mutex,
//!   so concurrent callers never observe a half-applied change.
//!
//! ## Usage
//!
//! ```rust
//! use lms_access_core::{PrincipalId, ResourceId};
//! use lms_access_registry::GrantRegistry;
//!
//! let registry = GrantRegistry::new();
//! let admin = PrincipalId::from("A1");
//!
//! registry.apply(&admin, &ResourceId::from("C1"), true);
//! assert!(registry.contains(&admin, &ResourceId::from("C1")));
//!
//! registry.clear(&admin);
//! assert!(registry.snapshot(&admin).is_empty());
//! ```

pub mod registry;

pub use registry::{GrantRegistry, RegistryView};
