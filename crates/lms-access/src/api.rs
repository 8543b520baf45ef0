//! Operation surface for a presentation layer or API gateway.
//!
//! Takes raw string identifiers, runs the coordinator, and reports the
//! outcome as a serializable status/code pair instead of a Rust error.

use std::sync::Arc;

use serde::Serialize;

use lms_access_core::{PrincipalId, ResourceId};
use lms_access_store::{AccessStore, ResourceCatalog};

use crate::coordinator::Coordinator;
use crate::error::{Result, StatusCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// Outcome of a mutating operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResponse {
    pub status: Status,
    pub code: StatusCode,
    /// Human-readable error description; absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OperationResponse {
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            code: StatusCode::Ok,
            message: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

impl<T> From<Result<T>> for OperationResponse {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(e) => Self {
                status: Status::Error,
                code: e.code(),
                message: Some(e.to_string()),
            },
        }
    }
}

/// Current confirmed grants of one principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
    pub resource_ids: Vec<ResourceId>,
}

/// String-keyed facade over a shared [`Coordinator`].
pub struct AccessApi<S, C> {
    coordinator: Arc<Coordinator<S, C>>,
}

impl<S, C> Clone for AccessApi<S, C> {
    fn clone(&self) -> Self {
        Self {
            coordinator: Arc::clone(&self.coordinator),
        }
    }
}

impl<S: AccessStore, C: ResourceCatalog> AccessApi<S, C> {
    pub fn new(coordinator: Arc<Coordinator<S, C>>) -> Self {
        Self { coordinator }
    }

    pub fn coordinator(&self) -> &Arc<Coordinator<S, C>> {
        &self.coordinator
    }

    pub async fn grant(&self, principal: &str, resource: &str) -> OperationResponse {
        self.coordinator
            .grant_access(&PrincipalId::from(principal), &ResourceId::from(resource))
            .await
            .into()
    }

    pub async fn revoke(&self, principal: &str, resource: &str) -> OperationResponse {
        self.coordinator
            .revoke_access(&PrincipalId::from(principal), &ResourceId::from(resource))
            .await
            .into()
    }

    pub async fn revoke_all(&self, principal: &str) -> OperationResponse {
        self.coordinator
            .revoke_all(&PrincipalId::from(principal))
            .await
            .into()
    }

    pub async fn refresh(&self, principal: &str) -> OperationResponse {
        self.coordinator
            .refresh(&PrincipalId::from(principal))
            .await
            .into()
    }

    pub fn snapshot(&self, principal: &str) -> SnapshotResponse {
        SnapshotResponse {
            resource_ids: self
                .coordinator
                .snapshot(&PrincipalId::from(principal))
                .into_iter()
                .collect(),
        }
    }
}
