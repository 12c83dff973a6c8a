//! Variant sub-flow
//!
//! Creating and saving variants of the product being edited. Every write is
//! followed by a full reload of the variant list: the server owns ordering
//! and derived fields, so the local list is never patched in place.

use std::sync::Arc;

use shared::models::{Product, Variant};

use crate::conflict::Outcome;
use crate::resource::ResourceClient;
use crate::ui::{Dialog, Presenter, VARIANT_CONFLICT_KEY};
use crate::{ClientError, ClientResult};

pub struct VariantWorkflow {
    products: ResourceClient,
    presenter: Arc<dyn Presenter>,
    /// Draft of an in-flight or conflicting creation
    draft: Option<Variant>,
    /// Variant open in the editor
    editing: Option<Variant>,
    /// Conflict raised by this workflow only
    conflict: Option<String>,
}

impl VariantWorkflow {
    pub fn new(products: ResourceClient, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            products,
            presenter,
            draft: None,
            editing: None,
            conflict: None,
        }
    }

    pub fn draft(&self) -> Option<&Variant> {
        self.draft.as_ref()
    }

    pub fn editing(&self) -> Option<&Variant> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut Variant> {
        self.editing.as_mut()
    }

    pub fn conflict(&self) -> Option<&str> {
        self.conflict.as_deref()
    }

    pub fn edit(&mut self, variant: Variant) {
        self.editing = Some(variant);
    }

    pub fn close_editor(&mut self) -> Option<Variant> {
        self.editing.take()
    }

    /// Variants sub-resource of a persisted product
    fn endpoint(&self, product: &Product) -> ClientResult<String> {
        if let Some(href) = product.variants_href() {
            return Ok(href.to_string());
        }
        let slug = product.slug.as_slug().ok_or(ClientError::NotPersisted)?;
        Ok(format!("{}/variants", self.products.resource_path(slug)))
    }

    /// Create a variant, then reload and open it in the editor.
    ///
    /// On a name conflict the draft is kept so the user can rename it.
    pub async fn create(
        &mut self,
        product: &Product,
        variants: &mut Vec<Variant>,
        draft: Variant,
    ) -> ClientResult<Outcome> {
        let client = self.products.scoped(self.endpoint(product)?);
        self.conflict = None;

        let pending = self.draft.insert(draft);
        let result = client.create(&*pending).await;

        match result.outcome {
            Outcome::Success => {
                self.draft = None;
                let slug = result.new_identifier().map(str::to_string);
                if slug.is_none() {
                    tracing::warn!(endpoint = client.endpoint(), "Variant created without a Location");
                }

                if let Err(e) = self.reload(product, variants).await {
                    tracing::warn!(error = %e, "Failed to reload variants after creation");
                    self.presenter.present(Dialog::ServerError);
                    return Ok(Outcome::Success);
                }

                let created = slug
                    .as_deref()
                    .and_then(|slug| variants.iter().find(|v| v.slug.as_slug() == Some(slug)));
                match created {
                    Some(variant) => {
                        tracing::info!(variant = ?slug, "Variant created");
                        self.editing = Some(variant.clone());
                    }
                    None => tracing::warn!(variant = ?slug, "Created variant missing from reloaded list"),
                }
            }
            Outcome::NameConflict => {
                self.conflict = Some(VARIANT_CONFLICT_KEY.to_string());
                self.presenter.present(Dialog::Conflict {
                    error_key: VARIANT_CONFLICT_KEY.to_string(),
                });
            }
            Outcome::GenericError => self.presenter.present(Dialog::ServerError),
        }

        Ok(result.outcome)
    }

    /// Save a variant at its `_href`, then reload and close the editor
    /// whatever the outcome.
    pub async fn save(
        &mut self,
        product: &Product,
        variants: &mut Vec<Variant>,
        variant: Variant,
    ) -> ClientResult<Outcome> {
        let location = variant
            .resource_location
            .clone()
            .ok_or_else(|| ClientError::MissingLocation(format!("variant {}", variant.slug)))?;

        let result = self.products.update(&location, &variant).await;
        self.editing = None;

        match result.outcome {
            Outcome::Success => tracing::info!(location = %location, "Variant saved"),
            Outcome::NameConflict => self.presenter.present(Dialog::Conflict {
                error_key: VARIANT_CONFLICT_KEY.to_string(),
            }),
            Outcome::GenericError => self.presenter.present(Dialog::ServerError),
        }

        if let Err(e) = self.reload(product, variants).await {
            tracing::warn!(error = %e, "Failed to reload variants after save");
            self.presenter.present(Dialog::ServerError);
        }

        Ok(result.outcome)
    }

    /// Replace the variant list with the server's. On failure the list is
    /// left as it was.
    pub async fn reload<'v>(
        &self,
        product: &Product,
        variants: &'v mut Vec<Variant>,
    ) -> ClientResult<&'v [Variant]> {
        let endpoint = self.endpoint(product)?;
        let fresh: Vec<Variant> = self.products.fetch(&endpoint).await?;
        tracing::debug!(count = fresh.len(), "Variants reloaded");
        *variants = fresh;
        Ok(variants.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingPresenter, ScriptedTransport};
    use crate::transport::TransportResponse;
    use serde_json::json;

    fn product() -> Product {
        serde_json::from_value(json!({
            "slug": "acme-widget",
            "_links": { "variants": { "href": "/api/products/acme-widget/variants" } }
        }))
        .unwrap()
    }

    fn workflow(transport: Arc<ScriptedTransport>, presenter: Arc<RecordingPresenter>) -> VariantWorkflow {
        VariantWorkflow::new(ResourceClient::new(transport, "/api/products"), presenter)
    }

    #[test]
    fn test_endpoint_falls_back_to_product_path() {
        let flow = workflow(ScriptedTransport::new(), RecordingPresenter::new());
        let mut product = Product::blank();
        assert!(matches!(flow.endpoint(&product), Err(ClientError::NotPersisted)));

        product.slug.assign("acme-widget");
        assert_eq!(flow.endpoint(&product).unwrap(), "/api/products/acme-widget/variants");
        assert_eq!(flow.endpoint(&self::product()).unwrap(), "/api/products/acme-widget/variants");
    }

    #[tokio::test]
    async fn test_create_success_reloads_and_opens_editor() {
        let transport = ScriptedTransport::new();
        transport.respond(TransportResponse::new(201).with_location("/api/products/acme-widget/variants/red"));
        transport.respond(TransportResponse::new(200).with_body(json!([
            { "slug": "blue", "_href": "/api/products/acme-widget/variants/blue" },
            { "slug": "red", "features": { "color": "red" }, "_href": "/api/products/acme-widget/variants/red" }
        ])));
        let presenter = RecordingPresenter::new();
        let mut flow = workflow(transport.clone(), presenter.clone());
        let mut variants = Vec::new();

        let draft = Variant::draft().with_feature("color", "red");
        let outcome = flow.create(&product(), &mut variants, draft).await.unwrap();

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(variants.len(), 2);
        assert!(flow.draft().is_none());
        assert_eq!(flow.editing().and_then(|v| v.slug.as_slug()), Some("red"));
        assert!(presenter.dialogs().is_empty());
        assert_eq!(
            transport.calls(),
            vec![
                "POST /api/products/acme-widget/variants".to_string(),
                "GET /api/products/acme-widget/variants".to_string(),
            ]
        );
        assert_eq!(transport.bodies()[0], Some(json!({ "features": { "color": "red" } })));
    }

    #[tokio::test]
    async fn test_create_conflict_keeps_draft_and_list() {
        let transport = ScriptedTransport::new();
        transport.respond(TransportResponse::new(409));
        let presenter = RecordingPresenter::new();
        let mut flow = workflow(transport.clone(), presenter.clone());
        let mut variants = vec![Variant::draft().with_title("existing")];

        let draft = Variant::draft().with_feature("color", "red");
        let outcome = flow.create(&product(), &mut variants, draft.clone()).await.unwrap();

        assert_eq!(outcome, Outcome::NameConflict);
        assert_eq!(flow.conflict(), Some(VARIANT_CONFLICT_KEY));
        assert_eq!(flow.draft(), Some(&draft));
        assert_eq!(variants.len(), 1);
        assert_eq!(transport.calls().len(), 1, "no reload on conflict");
        assert_eq!(
            presenter.dialogs(),
            vec![Dialog::Conflict {
                error_key: VARIANT_CONFLICT_KEY.to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_create_generic_error() {
        let transport = ScriptedTransport::new();
        transport.respond(TransportResponse::new(500));
        let presenter = RecordingPresenter::new();
        let mut flow = workflow(transport.clone(), presenter.clone());
        let mut variants = Vec::new();

        let outcome = flow.create(&product(), &mut variants, Variant::draft()).await.unwrap();
        assert_eq!(outcome, Outcome::GenericError);
        assert_eq!(flow.conflict(), None);
        assert_eq!(presenter.dialogs(), vec![Dialog::ServerError]);
    }

    #[tokio::test]
    async fn test_save_reloads_even_when_rejected() {
        let transport = ScriptedTransport::new();
        transport.respond(TransportResponse::new(500));
        transport.respond(TransportResponse::new(200).with_body(json!([{ "slug": "red" }])));
        let presenter = RecordingPresenter::new();
        let mut flow = workflow(transport.clone(), presenter.clone());
        let mut variants = Vec::new();

        let variant: Variant = serde_json::from_value(json!({
            "slug": "red",
            "_href": "/api/products/acme-widget/variants/red"
        }))
        .unwrap();
        flow.edit(variant.clone());

        let outcome = flow.save(&product(), &mut variants, variant).await.unwrap();
        assert_eq!(outcome, Outcome::GenericError);
        assert!(flow.editing().is_none());
        assert_eq!(variants.len(), 1);
        assert_eq!(
            transport.calls(),
            vec![
                "POST /api/products/acme-widget/variants/red".to_string(),
                "GET /api/products/acme-widget/variants".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_save_without_location() {
        let mut flow = workflow(ScriptedTransport::new(), RecordingPresenter::new());
        let mut variants = Vec::new();
        let err = flow
            .save(&product(), &mut variants, Variant::draft())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingLocation(_)));
    }

    #[tokio::test]
    async fn test_reload_failure_leaves_list() {
        let transport = ScriptedTransport::new();
        transport.fail("connection reset");
        let flow = workflow(transport, RecordingPresenter::new());
        let mut variants = vec![Variant::draft().with_title("kept")];

        assert!(flow.reload(&product(), &mut variants).await.is_err());
        assert_eq!(variants[0].title, "kept");
    }
}
