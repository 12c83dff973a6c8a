//! reqwest-backed transport

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use super::{Transport, TransportResponse, decode_body};
use crate::{ClientConfig, ClientResult};

/// Network transport
#[derive(Debug, Clone)]
pub struct NetworkTransport {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl NetworkTransport {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoints are server-relative paths; absolute URLs (e.g. `_href`
    /// values) pass through untouched.
    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
        }
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> ClientResult<TransportResponse> {
        let response = self.authorize(req).send().await?;
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        Ok(TransportResponse {
            status,
            location,
            body: decode_body(&bytes),
        })
    }
}

#[async_trait]
impl Transport for NetworkTransport {
    async fn create(&self, endpoint: &str, body: &Value) -> ClientResult<TransportResponse> {
        self.send(self.client.post(self.url(endpoint)).json(body)).await
    }

    async fn update(&self, endpoint: &str, body: &Value) -> ClientResult<TransportResponse> {
        self.send(self.client.post(self.url(endpoint)).json(body)).await
    }

    async fn fetch(&self, endpoint: &str) -> ClientResult<TransportResponse> {
        self.send(self.client.get(self.url(endpoint))).await
    }

    async fn delete(&self, endpoint: &str) -> ClientResult<TransportResponse> {
        self.send(self.client.delete(self.url(endpoint))).await
    }

    async fn submit_form(
        &self,
        endpoint: &str,
        fields: &[(&str, &str)],
    ) -> ClientResult<TransportResponse> {
        self.send(self.client.post(self.url(endpoint)).form(fields)).await
    }
}
