//! Response classification
//!
//! One mapping from HTTP status to [`Outcome`], shared by product creation,
//! product update and variant creation.

use std::fmt;

/// Classified result of a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Status below 400
    Success,
    /// 409: the name/slug is already taken, the user can rename and retry
    NameConflict,
    /// Any other failure, including transport failures
    GenericError,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::NameConflict => write!(f, "name_conflict"),
            Outcome::GenericError => write!(f, "generic_error"),
        }
    }
}

/// Maps response statuses onto [`Outcome`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictResolver;

impl ConflictResolver {
    pub const CONFLICT: u16 = 409;
    pub const FIRST_ERROR: u16 = 400;

    pub const fn classify(status: u16) -> Outcome {
        if status < Self::FIRST_ERROR {
            Outcome::Success
        } else if status == Self::CONFLICT {
            Outcome::NameConflict
        } else {
            Outcome::GenericError
        }
    }
}

impl From<u16> for Outcome {
    fn from(status: u16) -> Self {
        ConflictResolver::classify(status)
    }
}
