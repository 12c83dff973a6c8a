//! In-memory editing model
//!
//! The product being edited, its variants and its collection memberships.
//! No I/O happens here; the engine is the only writer of server-derived
//! state (`had` baselines, identifier, variant list).

use serde_json::{Map, Value};
use shared::models::{Collection, Identifier, Product, ProductDocument, Variant};

use crate::membership::{Membership, MembershipDiffer, Memberships};

#[derive(Debug, Clone, Default)]
pub struct EntityModel {
    pub(crate) product: Product,
    pub(crate) variants: Vec<Variant>,
    pub(crate) memberships: Memberships,
    pub(crate) collections: Vec<Collection>,
}

impl EntityModel {
    /// Template for a product that does not exist yet.
    ///
    /// No collections are known, so every membership reads `(false, false)`.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Model for an existing product.
    ///
    /// Takes the whole fetched document so memberships can only ever be
    /// seeded from a fully loaded entity.
    pub fn loaded(document: ProductDocument, collections: Vec<Collection>) -> Self {
        let memberships = MembershipDiffer::seed(&collections, &document.relationships);
        Self {
            product: document.product,
            variants: document.embedded.variants,
            memberships,
            collections,
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.product.title = title.into();
    }

    pub fn set_product_type(&mut self, product_type: Option<String>) {
        self.product.product_type = product_type;
    }

    /// Fields this client does not interpret; echoed back on save
    pub fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.product.extra
    }

    /// Take the slug the server assigned on creation. Returns `false` and
    /// keeps the current identifier if one is already set.
    pub(crate) fn assign_identifier(&mut self, slug: impl Into<String>) -> bool {
        self.product.slug.assign(slug)
    }

    pub(crate) fn mark_visible(&mut self) {
        self.product.on_shelf = Some(true);
    }

    pub fn identifier(&self) -> &Identifier {
        &self.product.slug
    }

    pub fn is_new(&self) -> bool {
        self.product.is_new()
    }

    pub fn visible(&self) -> Option<bool> {
        self.product.on_shelf
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn variant(&self, slug: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.slug.as_slug() == Some(slug))
    }

    /// Candidate collections known for this product
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn has_collections(&self) -> bool {
        !self.collections.is_empty()
    }

    pub fn memberships(&self) -> &Memberships {
        &self.memberships
    }

    /// Membership of one collection; unknown collections read `(false, false)`
    pub fn membership(&self, collection: &str) -> Membership {
        self.memberships.get(collection).copied().unwrap_or_default()
    }

    /// Set the desired membership. Only `has` changes.
    pub fn set_membership(&mut self, collection: impl Into<String>, has: bool) {
        self.memberships.entry(collection.into()).or_default().has = has;
    }

    pub fn has_pending_memberships(&self) -> bool {
        self.memberships.values().any(Membership::is_dirty)
    }

    /// Record that the server now matches the desired state
    pub(crate) fn mark_synchronized(&mut self, collection: &str) {
        if let Some(membership) = self.memberships.get_mut(collection) {
            membership.had = membership.has;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> ProductDocument {
        serde_json::from_value(json!({
            "slug": "acme-widget",
            "title": "Acme Widget",
            "_embedded": { "variants": [ { "slug": "red" }, { "slug": "blue" } ] },
            "_relationships": { "collections": [ { "_href": "/api/collections/sale" } ] }
        }))
        .unwrap()
    }

    fn collections() -> Vec<Collection> {
        ["summer", "sale"]
            .iter()
            .map(|slug| Collection {
                slug: slug.to_string(),
                title: String::new(),
                href: format!("/api/collections/{}", slug),
            })
            .collect()
    }

    #[test]
    fn test_blank_model() {
        let model = EntityModel::blank();
        assert!(model.is_new());
        assert!(model.variants().is_empty());
        assert!(!model.has_collections());
        assert_eq!(model.membership("summer"), Membership { has: false, had: false });
    }

    #[test]
    fn test_loaded_model() {
        let model = EntityModel::loaded(document(), collections());
        assert_eq!(model.identifier().as_slug(), Some("acme-widget"));
        assert_eq!(model.variants().len(), 2);
        assert!(model.variant("blue").is_some());
        assert!(model.has_collections());
        assert_eq!(model.membership("sale"), Membership::baseline(true));
        assert_eq!(model.membership("summer"), Membership::baseline(false));
        assert!(!model.has_pending_memberships());
    }

    #[test]
    fn test_set_membership_only_touches_has() {
        let mut model = EntityModel::loaded(document(), collections());
        model.set_membership("summer", true);
        assert_eq!(model.membership("summer"), Membership { has: true, had: false });
        assert!(model.has_pending_memberships());

        model.mark_synchronized("summer");
        assert_eq!(model.membership("summer"), Membership::baseline(true));
    }

    #[test]
    fn test_loaded_identifier_cannot_be_replaced() {
        let mut model = EntityModel::loaded(document(), collections());
        assert!(!model.assign_identifier("hijacked"));
        assert_eq!(model.identifier().as_slug(), Some("acme-widget"));
    }

    #[test]
    fn test_editing_leaves_identifier_and_visibility_alone() {
        let mut model = EntityModel::loaded(document(), collections());
        model.set_title("Acme Gadget");
        model.set_product_type(Some("shirt".into()));
        model.extra_mut().insert("price".into(), json!(12));

        assert_eq!(model.product().title, "Acme Gadget");
        assert_eq!(model.product().extra["price"], json!(12));
        assert_eq!(model.identifier().as_slug(), Some("acme-widget"));
        assert_eq!(model.visible(), None);

        model.mark_visible();
        assert_eq!(model.visible(), Some(true));
    }

    #[test]
    fn test_blank_model_takes_one_identifier() {
        let mut model = EntityModel::blank();
        assert!(model.assign_identifier("acme-widget"));
        assert!(!model.assign_identifier("other"));
        assert_eq!(model.identifier().as_slug(), Some("acme-widget"));
    }
}
