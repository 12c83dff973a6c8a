//! Numeric error codes carried in catalog API error bodies

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    Success = 0,
    Unknown = 1,
    ValidationFailed = 2,
    NotFound = 3,
    AlreadyExists = 4,
    InvalidRequest = 5,

    NotAuthenticated = 1001,
    TokenExpired = 1003,

    PermissionDenied = 2001,

    ProductNotFound = 6001,
    /// Product slug taken; surfaces as a name conflict
    ProductSlugExists = 6002,
    CollectionNotFound = 6101,
    VariantNotFound = 6201,
    /// Variant slug taken within the same product
    VariantSlugExists = 6202,

    InternalError = 9001,
    NetworkError = 9003,
    TimeoutError = 9004,
}

impl ErrorCode {
    /// Every defined code, in numeric order
    pub const ALL: [ErrorCode; 17] = [
        ErrorCode::Success,
        ErrorCode::Unknown,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::InvalidRequest,
        ErrorCode::NotAuthenticated,
        ErrorCode::TokenExpired,
        ErrorCode::PermissionDenied,
        ErrorCode::ProductNotFound,
        ErrorCode::ProductSlugExists,
        ErrorCode::CollectionNotFound,
        ErrorCode::VariantNotFound,
        ErrorCode::VariantSlugExists,
        ErrorCode::InternalError,
        ErrorCode::NetworkError,
        ErrorCode::TimeoutError,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// True for the slug collisions a client can resolve by renaming
    pub const fn is_name_conflict(&self) -> bool {
        matches!(self, ErrorCode::ProductSlugExists | ErrorCode::VariantSlugExists)
    }

    /// Default English message
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductSlugExists => "A product with this name already exists",
            ErrorCode::CollectionNotFound => "Collection not found",
            ErrorCode::VariantNotFound => "Variant not found",
            ErrorCode::VariantSlugExists => "A variant with this name already exists",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A u16 that is not a defined [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_converts_back() {
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
            assert!(!code.message().is_empty());
        }
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_table_is_sorted_and_unique() {
        assert!(ErrorCode::ALL.windows(2).all(|w| w[0].code() < w[1].code()));
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(ErrorCode::NotFound.to_string(), "E0003");
        assert_eq!(ErrorCode::ProductSlugExists.to_string(), "E6002");
    }

    #[test]
    fn test_name_conflicts() {
        assert!(ErrorCode::ProductSlugExists.is_name_conflict());
        assert!(ErrorCode::VariantSlugExists.is_name_conflict());
        assert!(!ErrorCode::AlreadyExists.is_name_conflict());
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::VariantSlugExists).unwrap();
        assert_eq!(json, "6202");
        let back: ErrorCode = serde_json::from_str("6002").unwrap();
        assert_eq!(back, ErrorCode::ProductSlugExists);
    }
}
