//! Resource client
//!
//! Create / update / fetch / delete against one named endpoint. Writes never
//! fail with `Err`: every result, including a dead connection, comes back as
//! a [`SyncResult`] carrying its [`Outcome`].

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::ApiErrorBody;
use shared::models::slug_from_location;

use crate::conflict::{ConflictResolver, Outcome};
use crate::transport::{Transport, TransportResponse};
use crate::{ClientError, ClientResult};

/// Classified result of a write
#[derive(Debug, Clone, PartialEq)]
pub struct SyncResult {
    pub outcome: Outcome,
    /// HTTP status; `None` when no response arrived
    pub status: Option<u16>,
    /// `Location` of a successful creation
    pub location_hint: Option<String>,
    pub payload: Option<Value>,
    /// Decoded error body of a failed write, when the server sent one
    pub error: Option<ApiErrorBody>,
}

impl SyncResult {
    pub fn from_response(response: TransportResponse) -> Self {
        let outcome = ConflictResolver::classify(response.status);
        let error = if outcome.is_success() {
            None
        } else {
            response
                .body
                .as_ref()
                .and_then(|body| serde_json::from_value::<ApiErrorBody>(body.clone()).ok())
        };
        Self {
            outcome,
            status: Some(response.status),
            location_hint: response.location.filter(|_| outcome.is_success()),
            payload: response.body,
            error,
        }
    }

    /// No response at all; surfaces like any other generic error
    pub fn transport_failure() -> Self {
        Self {
            outcome: Outcome::GenericError,
            status: None,
            location_hint: None,
            payload: None,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Slug of the created resource, derived from the `Location` header
    pub fn new_identifier(&self) -> Option<&str> {
        self.location_hint.as_deref().and_then(slug_from_location)
    }
}

/// Stateless client for one entity kind
#[derive(Clone)]
pub struct ResourceClient {
    transport: Arc<dyn Transport>,
    endpoint: String,
}

impl std::fmt::Debug for ResourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl ResourceClient {
    pub fn new(transport: Arc<dyn Transport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Same transport, another endpoint (e.g. a sub-resource)
    pub fn scoped(&self, endpoint: impl Into<String>) -> Self {
        Self::new(self.transport.clone(), endpoint)
    }

    /// Canonical address of one resource under this endpoint
    pub fn resource_path(&self, slug: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), slug)
    }

    /// POST a new resource to the endpoint
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> SyncResult {
        let body = match serde_json::to_value(body) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(endpoint = %self.endpoint, error = %e, "Failed to serialize payload");
                return SyncResult::transport_failure();
            }
        };
        tracing::debug!(endpoint = %self.endpoint, "create");
        let result = self.transport.create(&self.endpoint, &body).await;
        self.classify("create", &self.endpoint, result)
    }

    /// POST a resource to its canonical address
    pub async fn update<B: Serialize + ?Sized>(&self, location: &str, body: &B) -> SyncResult {
        let body = match serde_json::to_value(body) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(location, error = %e, "Failed to serialize payload");
                return SyncResult::transport_failure();
            }
        };
        tracing::debug!(location, "update");
        let result = self.transport.update(location, &body).await;
        self.classify("update", location, result)
    }

    pub async fn delete(&self, location: &str) -> SyncResult {
        tracing::debug!(location, "delete");
        let result = self.transport.delete(location).await;
        self.classify("delete", location, result)
    }

    pub async fn submit_form(&self, location: &str, fields: &[(&str, &str)]) -> SyncResult {
        tracing::debug!(location, "submit form");
        let result = self.transport.submit_form(location, fields).await;
        self.classify("submit_form", location, result)
    }

    /// GET and decode a resource
    pub async fn fetch<T: DeserializeOwned>(&self, location: &str) -> ClientResult<T> {
        tracing::debug!(location, "fetch");
        let response = self.transport.fetch(location).await?;

        if !ConflictResolver::classify(response.status).is_success() {
            let message = response
                .body
                .and_then(|body| serde_json::from_value::<ApiErrorBody>(body).ok())
                .map(|err| err.message)
                .unwrap_or_default();
            return Err(ClientError::Status {
                status: response.status,
                message,
            });
        }

        let body = response
            .body
            .ok_or_else(|| ClientError::InvalidResponse(format!("Empty body from {}", location)))?;
        Ok(serde_json::from_value(body)?)
    }

    fn classify(
        &self,
        operation: &'static str,
        location: &str,
        result: ClientResult<TransportResponse>,
    ) -> SyncResult {
        match result {
            Ok(response) => {
                let result = SyncResult::from_response(response);
                if !result.is_success() {
                    tracing::warn!(
                        operation,
                        location,
                        status = ?result.status,
                        outcome = %result.outcome,
                        code = ?result.error.as_ref().and_then(ApiErrorBody::error_code),
                        "Write rejected by server"
                    );
                }
                result
            }
            Err(e) => {
                tracing::warn!(operation, location, error = %e, "Transport failure");
                SyncResult::transport_failure()
            }
        }
    }
}
