//! Client configuration

use crate::{ClientError, ClientResult};

/// How a save of an existing product pairs with membership reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Reconcile memberships after every update, whatever the update outcome
    #[default]
    Independent,
    /// Reconcile memberships only after a successful update
    Atomic,
}

impl std::str::FromStr for SyncMode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "independent" => Ok(SyncMode::Independent),
            "atomic" => Ok(SyncMode::Atomic),
            other => Err(ClientError::Config(format!("unknown sync mode: {}", other))),
        }
    }
}

/// Client configuration for talking to the catalog API
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | CATALOG_API_URL | http://localhost:8080 | Server base URL |
/// | CATALOG_API_TOKEN | (none) | Bearer token |
/// | CATALOG_REQUEST_TIMEOUT_SECS | 30 | Per-request timeout |
/// | CATALOG_SYNC_MODE | independent | `independent` or `atomic` |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Product collection endpoint
    pub products_endpoint: String,

    /// Collection endpoint (listing and membership verbs)
    pub collections_endpoint: String,

    /// Configuration sections endpoint
    pub configuration_endpoint: String,

    pub sync_mode: SyncMode,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            products_endpoint: "/api/products".to_string(),
            collections_endpoint: "/api/collections".to_string(),
            configuration_endpoint: "/api/configuration".to_string(),
            sync_mode: SyncMode::Independent,
        }
    }

    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults; a malformed value is an error.
    pub fn from_env() -> ClientResult<Self> {
        let mut config = Self::new(
            std::env::var("CATALOG_API_URL").unwrap_or_else(|_| "http://localhost:8080".into()),
        );

        config.token = std::env::var("CATALOG_API_TOKEN")
            .ok()
            .filter(|s| !s.is_empty());

        if let Ok(timeout) = std::env::var("CATALOG_REQUEST_TIMEOUT_SECS") {
            config.timeout = timeout.parse().map_err(|_| {
                ClientError::Config(format!("CATALOG_REQUEST_TIMEOUT_SECS is not a number: {}", timeout))
            })?;
        }

        if let Ok(mode) = std::env::var("CATALOG_SYNC_MODE") {
            config.sync_mode = mode.parse()?;
        }

        Ok(config)
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_sync_mode(mut self, mode: SyncMode) -> Self {
        self.sync_mode = mode;
        self
    }

    /// Override the endpoint layout
    pub fn with_endpoints(
        mut self,
        products: impl Into<String>,
        collections: impl Into<String>,
        configuration: impl Into<String>,
    ) -> Self {
        self.products_endpoint = products.into();
        self.collections_endpoint = collections.into();
        self.configuration_endpoint = configuration.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
