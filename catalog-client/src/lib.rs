//! Catalog Client - product editor sync engine
//!
//! Keeps a locally edited product, its variants and its collection
//! memberships in step with the catalog REST API.

pub mod bus;
pub mod config;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod logger;
pub mod membership;
pub mod model;
pub mod resource;
pub mod settings;
pub mod transport;
pub mod ui;
pub mod variant;

#[cfg(test)]
mod testing;

pub use bus::{BroadcastBus, CatalogObserver};
pub use config::{ClientConfig, SyncMode};
pub use conflict::{ConflictResolver, Outcome};
pub use engine::{Collaborators, MembershipResult, ReconcileReport, SyncEngine, SyncReport};
pub use error::{ClientError, ClientResult};
pub use membership::{Membership, MembershipAction, MembershipDiffer, MembershipOp, Memberships};
pub use model::EntityModel;
pub use resource::{ResourceClient, SyncResult};
pub use settings::{ConfigurationProvider, DisplaySettings, HttpConfigurationProvider};
pub use transport::{NetworkTransport, OneshotTransport, Transport, TransportResponse};
pub use ui::{Dialog, LogNavigator, LogPresenter, Navigator, Presenter};
pub use variant::VariantWorkflow;

// Re-export shared types for convenience
pub use shared::models::{Collection, Identifier, Product, ProductDocument, Variant};
pub use shared::{CatalogEvent, ChangeOrigin};
