//! In-process transport
//!
//! Drives an axum `Router` through tower's `oneshot`, no socket involved.
//! Useful when the catalog API lives in the same process, and for tests.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Method, Request, header};
use serde_json::Value;
use tower::ServiceExt;

use super::{Transport, TransportResponse, decode_body};
use crate::{ClientError, ClientResult};

/// Oneshot transport
///
/// # Example
///
/// ```ignore
/// let router: Router = catalog_api().with_state(state);
/// let transport = OneshotTransport::new(router);
/// let response = transport.fetch("/api/products/acme-widget").await?;
/// ```
#[derive(Clone)]
pub struct OneshotTransport {
    router: Router,
    token: Option<String>,
}

impl std::fmt::Debug for OneshotTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneshotTransport")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl OneshotTransport {
    /// `router` must already have its state attached
    pub fn new(router: Router) -> Self {
        Self {
            router,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn build(
        &self,
        method: Method,
        endpoint: &str,
        content_type: Option<&'static str>,
        body: Body,
    ) -> ClientResult<Request<Body>> {
        let mut builder = Request::builder().method(method).uri(endpoint);
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder
            .body(body)
            .map_err(|e| ClientError::Transport(format!("Failed to build request: {}", e)))
    }

    async fn execute(&self, request: Request<Body>) -> ClientResult<TransportResponse> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Transport(format!("Oneshot call failed: {}", e)))?;

        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read body: {}", e)))?;

        Ok(TransportResponse {
            status,
            location,
            body: decode_body(&bytes),
        })
    }

    async fn send_json(&self, method: Method, endpoint: &str, body: &Value) -> ClientResult<TransportResponse> {
        let bytes = serde_json::to_vec(body)?;
        let request = self.build(method, endpoint, Some("application/json"), Body::from(bytes))?;
        self.execute(request).await
    }
}

#[async_trait]
impl Transport for OneshotTransport {
    async fn create(&self, endpoint: &str, body: &Value) -> ClientResult<TransportResponse> {
        self.send_json(Method::POST, endpoint, body).await
    }

    async fn update(&self, endpoint: &str, body: &Value) -> ClientResult<TransportResponse> {
        self.send_json(Method::POST, endpoint, body).await
    }

    async fn fetch(&self, endpoint: &str) -> ClientResult<TransportResponse> {
        let request = self.build(Method::GET, endpoint, None, Body::empty())?;
        self.execute(request).await
    }

    async fn delete(&self, endpoint: &str) -> ClientResult<TransportResponse> {
        let request = self.build(Method::DELETE, endpoint, None, Body::empty())?;
        self.execute(request).await
    }

    async fn submit_form(
        &self,
        endpoint: &str,
        fields: &[(&str, &str)],
    ) -> ClientResult<TransportResponse> {
        let encoded = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let request = self.build(
            Method::POST,
            endpoint,
            Some("application/x-www-form-urlencoded"),
            Body::from(encoded),
        )?;
        self.execute(request).await
    }
}
