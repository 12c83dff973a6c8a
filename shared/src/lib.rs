//! Shared types for the catalog workspace
//!
//! Wire models, wire error codes and catalog notification types used by
//! the catalog client and by any server or UI that talks to it.

pub mod error;
pub mod message;
pub mod models;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiErrorBody, ErrorCode};
pub use message::{CatalogEvent, ChangeOrigin};
