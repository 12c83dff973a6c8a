//! Product Model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Identifier, RelationshipRef, Variant};

/// Product entity, as written back to the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Identifier::is_new")]
    pub slug: Identifier,
    #[serde(default)]
    pub title: String,
    /// Visible in the shop. `None` until the product is published or
    /// explicitly withdrawn (the server sends `null`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_shelf: Option<bool>,
    /// Product type key, selects the variant feature set
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Blank template for a product that does not exist yet
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_new(&self) -> bool {
        self.slug.is_new()
    }

    /// Variants sub-resource address advertised by the server, if any
    pub fn variants_href(&self) -> Option<&str> {
        self.links.variants.as_ref().map(|link| link.href.as_str())
    }
}

/// Hypermedia links of a product (`_links`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Link>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Links {
    pub fn is_empty(&self) -> bool {
        self.variants.is_none() && self.other.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

/// Embedded sub-resources (`_embedded`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embedded {
    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// Relationship refs (`_relationships`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationships {
    #[serde(default)]
    pub collections: Vec<RelationshipRef>,
}

/// Full product document returned by `GET /api/products/{slug}`
///
/// Splits the server representation into the editable product, its embedded
/// variants and its membership relationships.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductDocument {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "_embedded", default)]
    pub embedded: Embedded,
    #[serde(rename = "_relationships", default)]
    pub relationships: Relationships,
}
