//! Proptest generators for property-based testing.

use proptest::prelude::*;

use lms_access_core::{PrincipalId, ResourceId};

/// Generate a principal id from a small pool, so scripts revisit principals.
pub fn principal_id() -> impl Strategy<Value = PrincipalId> {
    (1u8..=3).prop_map(|n| PrincipalId::new(format!("A{}", n)))
}

/// Generate a resource id from a small pool.
pub fn resource_id() -> impl Strategy<Value = ResourceId> {
    (1u8..=4).prop_map(|n| ResourceId::new(format!("C{}", n)))
}

/// One coordinator operation, optionally with an injected store failure.
#[derive(Debug, Clone)]
pub enum Op {
    Grant {
        principal: PrincipalId,
        resource: ResourceId,
        fail: bool,
    },
    Revoke {
        principal: PrincipalId,
        resource: ResourceId,
        fail: bool,
    },
    RevokeAll {
        principal: PrincipalId,
        fail: bool,
    },
}

impl Op {
    /// Whether the store call for this op should be made to fail.
    pub fn fails(&self) -> bool {
        match self {
            Op::Grant { fail, .. } | Op::Revoke { fail, .. } | Op::RevokeAll { fail, .. } => *fail,
        }
    }

    pub fn principal(&self) -> &PrincipalId {
        match self {
            Op::Grant { principal, .. }
            | Op::Revoke { principal, .. }
            | Op::RevokeAll { principal, .. } => principal,
        }
    }
}

fn op() -> impl Strategy<Value = Op> {
    // Roughly one call in five fails.
    let fail = prop::bool::weighted(0.2);
    prop_oneof![
        4 => (principal_id(), resource_id(), fail.clone())
            .prop_map(|(principal, resource, fail)| Op::Grant { principal, resource, fail }),
        3 => (principal_id(), resource_id(), fail.clone())
            .prop_map(|(principal, resource, fail)| Op::Revoke { principal, resource, fail }),
        1 => (principal_id(), fail)
            .prop_map(|(principal, fail)| Op::RevokeAll { principal, fail }),
    ]
}

/// A sequence of operations to replay against a coordinator.
#[derive(Debug, Clone)]
pub struct OpScript {
    pub ops: Vec<Op>,
}

impl Arbitrary for OpScript {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop::collection::vec(op(), 0..48)
            .prop_map(|ops| OpScript { ops })
            .boxed()
    }
}
