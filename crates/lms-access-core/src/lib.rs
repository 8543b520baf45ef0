//! # LMS Access Core
//!
//! Pure types for access-grant management: who can be granted access
//! (principals), what they can be granted access to (resources), and the
//! keys used to track mutating operations while they are in flight.
//!
//! This crate contains no I/O, no storage, no async. It is shared by the
//! store, registry and coordinator crates.
//!
//! ## Key Types
//!
//! - [`PrincipalId`] / [`Principal`] - An administrator that can hold grants
//! - [`ResourceId`] / [`Resource`] - A class that access is granted over
//! - [`Verb`] - The kind of mutating operation
//! - [`OperationKey`] - `(principal, resource, verb)` identity of an operation
//! - [`ValidationError`] - Rejections raised before any remote call

pub mod error;
pub mod operation;
pub mod types;
pub mod validation;

pub use error::{Result, ValidationError};
pub use operation::{OperationKey, Verb};
pub use types::{Principal, PrincipalId, Resource, ResourceId};
pub use validation::{validate_pair, validate_principal, validate_resource};
