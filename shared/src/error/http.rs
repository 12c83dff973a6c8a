//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound
            | Self::ProductNotFound
            | Self::CollectionNotFound
            | Self::VariantNotFound => StatusCode::NOT_FOUND,

            // Naming collisions are the only 409s; clients offer a rename on these
            Self::AlreadyExists | Self::ProductSlugExists | Self::VariantSlugExists => {
                StatusCode::CONFLICT
            }

            Self::NotAuthenticated | Self::TokenExpired => StatusCode::UNAUTHORIZED,

            Self::PermissionDenied => StatusCode::FORBIDDEN,

            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            Self::InternalError | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            Self::ValidationFailed | Self::InvalidRequest => StatusCode::BAD_REQUEST,
        }
    }
}
