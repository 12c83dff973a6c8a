//! Wire error codes for the catalog API
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 6xxx: Catalog errors (products, collections, variants)
//! - 9xxx: System errors

mod codes;
mod http;

pub use codes::{ErrorCode, InvalidErrorCode};

use serde::{Deserialize, Serialize};

/// Error body returned by the catalog API on a non-2xx response
///
/// ```json
/// { "code": 6002, "message": "Product slug already exists" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Raw numeric code, kept as-is so unknown codes survive decoding
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiErrorBody {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code: code.code(),
            message: code.message().to_string(),
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            details: None,
        }
    }

    /// Typed code, if the server sent one this build knows about
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::try_from(self.code).ok()
    }
}

impl From<ErrorCode> for ApiErrorBody {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}
