//! Catalog notifications
//!
//! Fire-and-forget signals emitted after a write reached the server, so that
//! other views (catalog tree, listings) can refresh themselves.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What caused the catalog to change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOrigin {
    ProductCreated,
    ProductDeleted,
    MembershipAdded,
    MembershipRemoved,
}

impl fmt::Display for ChangeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeOrigin::ProductCreated => write!(f, "product_created"),
            ChangeOrigin::ProductDeleted => write!(f, "product_deleted"),
            ChangeOrigin::MembershipAdded => write!(f, "membership_added"),
            ChangeOrigin::MembershipRemoved => write!(f, "membership_removed"),
        }
    }
}

/// Catalog bus event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CatalogEvent {
    /// The catalog changed on the server; listeners should refetch
    CatalogChanged {
        origin: ChangeOrigin,
        /// Product the change concerns
        product: String,
        /// Collection involved, for membership changes
        #[serde(default, skip_serializing_if = "Option::is_none")]
        collection: Option<String>,
    },
}

impl CatalogEvent {
    pub fn changed(origin: ChangeOrigin, product: impl Into<String>) -> Self {
        Self::CatalogChanged {
            origin,
            product: product.into(),
            collection: None,
        }
    }

    pub fn membership(origin: ChangeOrigin, product: impl Into<String>, collection: impl Into<String>) -> Self {
        Self::CatalogChanged {
            origin,
            product: product.into(),
            collection: Some(collection.into()),
        }
    }

    pub fn origin(&self) -> ChangeOrigin {
        match self {
            Self::CatalogChanged { origin, .. } => *origin,
        }
    }
}
