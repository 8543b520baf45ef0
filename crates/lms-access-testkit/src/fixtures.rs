//! Test fixtures and helpers.
//!
//! Sample data lives here, never in the coordinator itself.

use lms_access_core::{Principal, PrincipalId, Resource, ResourceId};

/// Shorthand for a principal id.
pub fn admin(id: &str) -> PrincipalId {
    PrincipalId::from(id)
}

/// Shorthand for a resource id.
pub fn class(id: &str) -> ResourceId {
    ResourceId::from(id)
}

/// Three classes, `C1`..`C3`, in catalog order.
pub fn sample_catalog() -> Vec<Resource> {
    vec![
        Resource::new("C1", "CS101", "Introduction to Computer Science", "Dr. Reyes"),
        Resource::new("C2", "MA201", "Linear Algebra", "Dr. Okafor"),
        Resource::new("C3", "PH110", "Physics I", "Dr. Lindqvist"),
    ]
}

/// Administrators `A1`..`An`.
pub fn sample_admins(count: usize) -> Vec<Principal> {
    (1..=count)
        .map(|i| Principal::new(format!("A{}", i), format!("Admin {}", i)))
        .collect()
}
