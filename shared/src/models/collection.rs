//! Collection Model

use serde::{Deserialize, Serialize};

/// Collection a product can be a member of
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub slug: String,
    #[serde(default)]
    pub title: String,
    /// Canonical address, compared against a product's relationship refs
    #[serde(rename = "_href")]
    pub href: String,
}

/// Reference to a related resource inside `_relationships`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRef {
    #[serde(rename = "_href")]
    pub href: String,
}
