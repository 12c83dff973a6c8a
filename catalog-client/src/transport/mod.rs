//! Transport layer
//!
//! The engine talks to the catalog API through the object-safe [`Transport`]
//! trait. Two implementations exist: [`NetworkTransport`] over reqwest and
//! [`OneshotTransport`], which drives an axum `Router` in-process.

mod network;
mod oneshot;

pub use network::NetworkTransport;
pub use oneshot::OneshotTransport;

use async_trait::async_trait;
use serde_json::Value;

use crate::ClientResult;

/// Raw outcome of one request: whatever the server said, unclassified
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    /// `Location` header, set by the server on creation
    pub location: Option<String>,
    /// JSON body, if the server sent one
    pub body: Option<Value>,
}

impl TransportResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            location: None,
            body: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Transport trait
///
/// An `Err` means the request never produced a response (connection refused,
/// timeout, broken body). Any HTTP status, including 4xx/5xx, is an `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body to a collection endpoint
    async fn create(&self, endpoint: &str, body: &Value) -> ClientResult<TransportResponse>;

    /// POST a JSON body to a resource's canonical address
    async fn update(&self, endpoint: &str, body: &Value) -> ClientResult<TransportResponse>;

    /// GET a resource
    async fn fetch(&self, endpoint: &str) -> ClientResult<TransportResponse>;

    /// DELETE a resource
    async fn delete(&self, endpoint: &str) -> ClientResult<TransportResponse>;

    /// POST `application/x-www-form-urlencoded` fields
    async fn submit_form(
        &self,
        endpoint: &str,
        fields: &[(&str, &str)],
    ) -> ClientResult<TransportResponse>;
}

/// Decode a response body; empty or non-JSON bodies yield `None`
pub(crate) fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "Response body is not JSON, ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b""), None);
        assert_eq!(decode_body(b"  \n"), None);
        assert_eq!(decode_body(b"<html>"), None);
        assert_eq!(decode_body(br#"{"slug":"red"}"#), Some(serde_json::json!({"slug": "red"})));
    }
}
