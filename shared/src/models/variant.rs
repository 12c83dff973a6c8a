//! Variant Model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::Identifier;

/// Variant of a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default, skip_serializing_if = "Identifier::is_new")]
    pub slug: Identifier,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Feature name -> selected value; shape is up to the product type
    #[serde(default)]
    pub features: BTreeMap<String, Value>,
    /// Address used for updates once the variant exists (`_href`)
    #[serde(rename = "_href", default, skip_serializing_if = "Option::is_none")]
    pub resource_location: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Variant {
    /// Blank variant for the creation dialog
    pub fn draft() -> Self {
        Self::default()
    }

    pub fn with_feature(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.features.insert(name.into(), value.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_serializes_empty_features() {
        let draft = Variant::draft();
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json, serde_json::json!({ "features": {} }));
    }

    #[test]
    fn test_decode_keeps_unknown_fields() {
        let variant: Variant = serde_json::from_value(serde_json::json!({
            "slug": "red",
            "title": "Red",
            "features": { "color": "red" },
            "_href": "/api/products/acme-widget/variants/red",
            "price": 1200
        }))
        .unwrap();
        assert_eq!(variant.slug.as_slug(), Some("red"));
        assert_eq!(
            variant.resource_location.as_deref(),
            Some("/api/products/acme-widget/variants/red")
        );
        assert_eq!(variant.extra["price"], 1200);
    }
}
