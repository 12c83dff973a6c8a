//! Display settings
//!
//! Feature flags that only change what the editor shows (weight, stock,
//! currency, product types). Synchronization never reads them.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::ClientResult;
use crate::resource::ResourceClient;

/// Source of configuration sections
#[async_trait]
pub trait ConfigurationProvider: Send + Sync {
    async fn get(&self, section: &str) -> ClientResult<Value>;
}

/// Reads `{endpoint}/{section}` from the catalog API
#[derive(Debug, Clone)]
pub struct HttpConfigurationProvider {
    client: ResourceClient,
}

impl HttpConfigurationProvider {
    pub fn new(client: ResourceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConfigurationProvider for HttpConfigurationProvider {
    async fn get(&self, section: &str) -> ClientResult<Value> {
        self.client.fetch(&self.client.resource_path(section)).await
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogSection {
    #[serde(default)]
    products: ProductFlags,
    #[serde(default)]
    currencies: Currencies,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductFlags {
    #[serde(default)]
    weight: bool,
    #[serde(default)]
    weight_unit: Option<String>,
    #[serde(default)]
    stock: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Currencies {
    #[serde(default)]
    main: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EntitiesSection {
    #[serde(default)]
    product: Option<EntityTypes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EntityTypes {
    #[serde(default)]
    types: BTreeMap<String, ProductType>,
}

/// Product type: the features its variants are built from
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductType {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub features: BTreeMap<String, FeatureDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeatureDefinition {
    #[serde(default)]
    pub name: Option<String>,
    /// Allowed values, keyed by value slug
    #[serde(default)]
    pub keys: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplaySettings {
    pub has_weight: bool,
    pub weight_unit: Option<String>,
    pub has_stock: bool,
    pub main_currency: Option<String>,
    pub types: BTreeMap<String, ProductType>,
}

impl DisplaySettings {
    /// Read the `catalog` and `entities` sections
    pub async fn load(provider: &dyn ConfigurationProvider) -> ClientResult<Self> {
        let catalog: CatalogSection = serde_json::from_value(provider.get("catalog").await?)?;
        let entities: EntitiesSection = serde_json::from_value(provider.get("entities").await?)?;

        Ok(Self {
            has_weight: catalog.products.weight,
            weight_unit: catalog.products.weight_unit,
            has_stock: catalog.products.stock,
            main_currency: catalog.currencies.main,
            types: entities.product.map(|p| p.types).unwrap_or_default(),
        })
    }

    pub fn has_types(&self) -> bool {
        !self.types.is_empty()
    }

    /// Allowed value keys of one feature of a product type
    pub fn feature_keys(&self, product_type: &str, feature: &str) -> Vec<&str> {
        self.types
            .get(product_type)
            .and_then(|t| t.features.get(feature))
            .map(|f| f.keys.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use serde_json::json;
    use std::collections::HashMap;

    struct StaticProvider(HashMap<&'static str, Value>);

    #[async_trait]
    impl ConfigurationProvider for StaticProvider {
        async fn get(&self, section: &str) -> ClientResult<Value> {
            self.0
                .get(section)
                .cloned()
                .ok_or_else(|| ClientError::Status {
                    status: 404,
                    message: section.to_string(),
                })
        }
    }

    #[tokio::test]
    async fn test_load_full_settings() {
        let provider = StaticProvider(HashMap::from([
            (
                "catalog",
                json!({
                    "products": { "weight": true, "weightUnit": "kg", "stock": true },
                    "currencies": { "main": "EUR" }
                }),
            ),
            (
                "entities",
                json!({
                    "product": { "types": { "shirt": { "name": "Shirt", "features": {
                        "color": { "name": "Color", "keys": { "red": { "title": "Red" }, "blue": { "title": "Blue" } } }
                    } } } }
                }),
            ),
        ]));

        let settings = DisplaySettings::load(&provider).await.unwrap();
        assert!(settings.has_weight);
        assert_eq!(settings.weight_unit.as_deref(), Some("kg"));
        assert!(settings.has_stock);
        assert_eq!(settings.main_currency.as_deref(), Some("EUR"));
        assert!(settings.has_types());
        assert_eq!(settings.feature_keys("shirt", "color"), vec!["blue", "red"]);
        assert!(settings.feature_keys("shirt", "size").is_empty());
    }

    #[tokio::test]
    async fn test_no_product_types() {
        let provider = StaticProvider(HashMap::from([
            ("catalog", json!({})),
            ("entities", json!({ "page": {} })),
        ]));

        let settings = DisplaySettings::load(&provider).await.unwrap();
        assert!(!settings.has_weight);
        assert!(!settings.has_types());
    }

    #[tokio::test]
    async fn test_missing_section_is_an_error() {
        let provider = StaticProvider(HashMap::from([("catalog", json!({}))]));
        assert!(DisplaySettings::load(&provider).await.is_err());
    }
}
