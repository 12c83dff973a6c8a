//! Synchronization engine
//!
//! Decides which calls to issue for the product being edited, in which
//! order, and folds the classified responses back into the [`EntityModel`].
//!
//! All mutation happens on `&mut self` between awaits, so the model never
//! sees concurrent writers. Membership calls run concurrently with each
//! other; each one only touches its own collection entry once it resolves.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::join_all;
use shared::models::{Collection, ProductDocument, Variant};
use shared::{CatalogEvent, ChangeOrigin};
use tracing::Instrument;
use uuid::Uuid;

use crate::bus::{BroadcastBus, CatalogObserver};
use crate::config::{ClientConfig, SyncMode};
use crate::conflict::Outcome;
use crate::membership::{MembershipAction, MembershipDiffer};
use crate::model::EntityModel;
use crate::resource::ResourceClient;
use crate::settings::{ConfigurationProvider, DisplaySettings, HttpConfigurationProvider};
use crate::transport::Transport;
use crate::ui::{Dialog, LISTING_ROUTE, LogNavigator, LogPresenter, Navigator, Presenter, product_route};
use crate::variant::VariantWorkflow;
use crate::{ClientError, ClientResult};

/// External collaborators of the engine
#[derive(Clone)]
pub struct Collaborators {
    pub transport: Arc<dyn Transport>,
    pub presenter: Arc<dyn Presenter>,
    pub navigator: Arc<dyn Navigator>,
    pub observer: Arc<dyn CatalogObserver>,
    /// Defaults to the catalog API's configuration endpoint
    pub configuration: Option<Arc<dyn ConfigurationProvider>>,
}

impl Collaborators {
    /// Headless defaults: logging presenter and navigator, a private bus
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            presenter: Arc::new(LogPresenter::default()),
            navigator: Arc::new(LogNavigator),
            observer: Arc::new(BroadcastBus::default()),
            configuration: None,
        }
    }

    pub fn with_presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn CatalogObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_configuration(mut self, configuration: Arc<dyn ConfigurationProvider>) -> Self {
        self.configuration = Some(configuration);
        self
    }
}

/// What `synchronize_entity` did
#[derive(Debug, Clone, PartialEq)]
pub enum SyncReport {
    /// A creation was already in flight; nothing was sent
    InProgress,
    /// The product now exists under `slug`
    Created { slug: String },
    /// The creation was refused; the model is untouched
    CreateRejected(Outcome),
    /// An existing product was saved. `memberships` is `None` when
    /// reconciliation was skipped.
    Updated {
        outcome: Outcome,
        memberships: Option<ReconcileReport>,
    },
}

/// Result of one membership call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipResult {
    pub collection: String,
    pub action: MembershipAction,
    pub outcome: Outcome,
}

/// Per-collection results of one reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub results: Vec<MembershipResult>,
}

impl ReconcileReport {
    /// Number of calls issued
    pub fn issued(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &MembershipResult> {
        self.results.iter().filter(|r| !r.outcome.is_success())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Clears the saving flag when the creation finishes or is dropped
struct SavingGuard(Arc<AtomicBool>);

impl SavingGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for SavingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SyncEngine {
    products: ResourceClient,
    collections: ResourceClient,
    configuration: Arc<dyn ConfigurationProvider>,
    presenter: Arc<dyn Presenter>,
    navigator: Arc<dyn Navigator>,
    observer: Arc<dyn CatalogObserver>,
    mode: SyncMode,
    model: EntityModel,
    variants: VariantWorkflow,
    settings: DisplaySettings,
    saving: Arc<AtomicBool>,
}

impl SyncEngine {
    /// Engine for a product that does not exist yet. No I/O.
    pub fn blank(config: &ClientConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            transport,
            presenter,
            navigator,
            observer,
            configuration,
        } = collaborators;

        let products = ResourceClient::new(transport.clone(), config.products_endpoint.clone());
        let collections = ResourceClient::new(transport.clone(), config.collections_endpoint.clone());
        let configuration = configuration.unwrap_or_else(|| {
            Arc::new(HttpConfigurationProvider::new(ResourceClient::new(
                transport,
                config.configuration_endpoint.clone(),
            )))
        });
        let variants = VariantWorkflow::new(products.clone(), presenter.clone());

        Self {
            products,
            collections,
            configuration,
            presenter,
            navigator,
            observer,
            mode: config.sync_mode,
            model: EntityModel::blank(),
            variants,
            settings: DisplaySettings::default(),
            saving: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Engine for an existing product.
    ///
    /// Fetches the product first and the collection catalog second, then
    /// seeds memberships from the complete document.
    pub async fn load(
        config: &ClientConfig,
        collaborators: Collaborators,
        slug: &str,
    ) -> ClientResult<Self> {
        let mut engine = Self::blank(config, collaborators);

        let document: ProductDocument = engine.products.fetch(&engine.products.resource_path(slug)).await?;
        let collections: Vec<Collection> = engine.collections.fetch(engine.collections.endpoint()).await?;
        engine.model = EntityModel::loaded(document, collections);

        tracing::info!(
            slug,
            variants = engine.model.variants().len(),
            collections = engine.model.collections().len(),
            "Product loaded"
        );
        Ok(engine)
    }

    pub fn model(&self) -> &EntityModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut EntityModel {
        &mut self.model
    }

    pub fn sync_mode(&self) -> SyncMode {
        self.mode
    }

    /// True while a creation is in flight
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    /// Shared handle on the saving flag, readable while the engine is busy
    pub fn saving_indicator(&self) -> Arc<AtomicBool> {
        self.saving.clone()
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub async fn refresh_settings(&mut self) -> ClientResult<&DisplaySettings> {
        self.settings = DisplaySettings::load(self.configuration.as_ref()).await?;
        Ok(&self.settings)
    }

    /// Allowed values of a variant feature for the product's type
    pub fn feature_keys(&self, feature: &str) -> Vec<&str> {
        match self.model.product().product_type.as_deref() {
            Some(product_type) => self.settings.feature_keys(product_type, feature),
            None => Vec::new(),
        }
    }

    // ========== Product ==========

    /// Create or update the product, depending on whether it has a slug.
    ///
    /// Updates are followed by membership reconciliation. In
    /// [`SyncMode::Independent`] that happens whatever the update outcome,
    /// so a failed update can still leave memberships changed on the server.
    pub async fn synchronize_entity(&mut self) -> ClientResult<SyncReport> {
        let span = tracing::info_span!(
            "synchronize",
            sync_id = %Uuid::new_v4(),
            product = %self.model.identifier()
        );

        match self.model.identifier().as_slug().map(str::to_string) {
            None => Ok(self.create_entity().instrument(span).await),
            Some(slug) => self.update_entity(slug).instrument(span).await,
        }
    }

    async fn create_entity(&mut self) -> SyncReport {
        let Some(_guard) = SavingGuard::acquire(&self.saving) else {
            tracing::warn!("Creation already in progress, ignoring");
            return SyncReport::InProgress;
        };

        let result = self.products.create(&self.model.product).await;

        match result.outcome {
            Outcome::Success => {
                let Some(slug) = result.new_identifier().map(str::to_string) else {
                    tracing::error!(location = ?result.location_hint, "Product created without a usable Location");
                    self.presenter.present(Dialog::ServerError);
                    return SyncReport::CreateRejected(Outcome::GenericError);
                };

                self.model.assign_identifier(slug.clone());
                tracing::info!(slug = %slug, "Product created");
                self.observer
                    .notify(CatalogEvent::changed(ChangeOrigin::ProductCreated, &slug));
                self.navigator.navigate(&product_route(&slug));
                SyncReport::Created { slug }
            }
            Outcome::NameConflict => {
                self.presenter.present(Dialog::NameConflict);
                SyncReport::CreateRejected(Outcome::NameConflict)
            }
            Outcome::GenericError => {
                self.presenter.present(Dialog::ServerError);
                SyncReport::CreateRejected(Outcome::GenericError)
            }
        }
    }

    async fn update_entity(&mut self, slug: String) -> ClientResult<SyncReport> {
        let location = self.products.resource_path(&slug);
        let result = self.products.update(&location, &self.model.product).await;

        match result.outcome {
            Outcome::Success => tracing::info!(slug = %slug, "Product updated"),
            Outcome::NameConflict => self.presenter.present(Dialog::NameConflict),
            Outcome::GenericError => self.presenter.present(Dialog::ServerError),
        }

        let memberships = match self.mode {
            SyncMode::Independent => Some(self.reconcile_memberships().await?),
            SyncMode::Atomic if result.is_success() => Some(self.reconcile_memberships().await?),
            SyncMode::Atomic => {
                tracing::warn!(slug = %slug, "Update failed, membership changes held back");
                None
            }
        };

        Ok(SyncReport::Updated {
            outcome: result.outcome,
            memberships,
        })
    }

    /// Issue one add/remove call per changed collection, all at once.
    ///
    /// Each successful call moves that entry's baseline to the desired state
    /// and emits a catalog change. Failed entries keep their baseline and are
    /// retried by the next reconciliation.
    pub async fn reconcile_memberships(&mut self) -> ClientResult<ReconcileReport> {
        let product = self
            .model
            .identifier()
            .as_slug()
            .ok_or(ClientError::NotPersisted)?
            .to_string();

        let plan = MembershipDiffer::plan(self.model.memberships());
        if plan.is_empty() {
            tracing::debug!("Memberships already in sync");
            return Ok(ReconcileReport::default());
        }

        let collections = &self.collections;
        let observer = &self.observer;
        let calls = plan.into_iter().map(|op| {
            let product = product.as_str();
            async move {
                let location = format!(
                    "{}/{}",
                    collections.resource_path(&op.collection),
                    op.action.verb()
                );
                let result = collections.submit_form(&location, &[("product", product)]).await;
                if result.is_success() {
                    tracing::info!(collection = %op.collection, action = op.action.verb(), "Membership updated");
                    observer.notify(CatalogEvent::membership(op.action.origin(), product, &op.collection));
                }
                MembershipResult {
                    collection: op.collection,
                    action: op.action,
                    outcome: result.outcome,
                }
            }
        });
        let results = join_all(calls).await;

        for result in results.iter().filter(|r| r.outcome.is_success()) {
            self.model.mark_synchronized(&result.collection);
        }

        let report = ReconcileReport { results };
        if !report.all_succeeded() {
            tracing::warn!(failed = report.failures().count(), "Some membership changes were rejected");
            self.presenter.present(Dialog::ServerError);
        }
        Ok(report)
    }

    /// Put the product on the shelf and save it
    pub async fn publish(&mut self) -> ClientResult<SyncReport> {
        self.model.mark_visible();
        self.synchronize_entity().await
    }

    /// Delete the product. Confirmation, if any, is the caller's business.
    pub async fn delete_entity(&mut self) -> ClientResult<Outcome> {
        let slug = self
            .model
            .identifier()
            .as_slug()
            .ok_or(ClientError::NotPersisted)?
            .to_string();

        let result = self.products.delete(&self.products.resource_path(&slug)).await;
        if result.is_success() {
            tracing::info!(slug = %slug, "Product deleted");
            self.presenter.close_active();
            self.observer
                .notify(CatalogEvent::changed(ChangeOrigin::ProductDeleted, &slug));
            self.navigator.navigate(LISTING_ROUTE);
        } else {
            self.presenter.present(Dialog::ServerError);
        }
        Ok(result.outcome)
    }

    /// Ask for confirmation, then delete. `None` when the user declined.
    pub async fn confirm_and_delete(&mut self) -> ClientResult<Option<Outcome>> {
        if !self.presenter.confirm(Dialog::ConfirmDeletion).await {
            tracing::debug!("Deletion declined");
            return Ok(None);
        }
        self.delete_entity().await.map(Some)
    }

    // ========== Variants ==========

    pub fn variant_workflow(&self) -> &VariantWorkflow {
        &self.variants
    }

    /// Fresh draft for the creation dialog
    pub fn begin_variant(&self) -> Variant {
        Variant::draft()
    }

    pub async fn create_variant(&mut self, draft: Variant) -> ClientResult<Outcome> {
        self.variants
            .create(&self.model.product, &mut self.model.variants, draft)
            .await
    }

    pub async fn save_variant(&mut self, variant: Variant) -> ClientResult<Outcome> {
        self.variants
            .save(&self.model.product, &mut self.model.variants, variant)
            .await
    }

    /// Open a variant in the editor
    pub fn edit_variant(&mut self, variant: Variant) {
        self.variants.edit(variant);
    }

    pub fn editing_variant_mut(&mut self) -> Option<&mut Variant> {
        self.variants.editing_mut()
    }

    /// Save whatever is open in the editor
    pub async fn save_editing_variant(&mut self) -> ClientResult<Option<Outcome>> {
        match self.variants.close_editor() {
            Some(variant) => self.save_variant(variant).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn reload_variants(&mut self) -> ClientResult<&[Variant]> {
        let fresh = self
            .variants
            .reload(&self.model.product, &mut self.model.variants)
            .await?;
        Ok(fresh)
    }

    /// Reload, then hand the fresh list to `on_done`
    pub async fn reload_variants_then<F>(&mut self, on_done: F) -> ClientResult<()>
    where
        F: FnOnce(&[Variant]),
    {
        let fresh = self.reload_variants().await?;
        on_done(fresh);
        Ok(())
    }
}
