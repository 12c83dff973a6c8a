//! Data models
//!
//! Wire shapes of the catalog API. Fields the client does not interpret are
//! kept in a flattened `extra` map so a model read from the server can be
//! written back without losing anything.

pub mod collection;
pub mod identifier;
pub mod product;
pub mod variant;

// Re-exports
pub use collection::*;
pub use identifier::*;
pub use product::*;
pub use variant::*;
