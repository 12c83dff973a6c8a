//! UI seams
//!
//! The engine never renders anything. It asks a [`Presenter`] to show
//! dialogs and a [`Navigator`] to change route.

use async_trait::async_trait;

/// Error key shown when a variant slug is already taken
pub const VARIANT_CONFLICT_KEY: &str = "product.variants.conflict";

/// Address of the catalog listing
pub const LISTING_ROUTE: &str = "/catalog";

/// Canonical UI address of a product
pub fn product_route(slug: &str) -> String {
    format!("/products/{}", slug)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    /// Product name/slug already taken
    NameConflict,
    /// Catch-all failure
    ServerError,
    /// Scoped conflict with a translation key
    Conflict { error_key: String },
    /// Ask before deleting the product
    ConfirmDeletion,
}

#[async_trait]
pub trait Presenter: Send + Sync {
    /// Show a dialog without waiting for it
    fn present(&self, dialog: Dialog);

    /// Show a dialog and wait for the user's answer
    async fn confirm(&self, dialog: Dialog) -> bool;

    /// Close whichever dialog is open
    fn close_active(&self);
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Presenter for headless use: logs dialogs, answers confirmations with a
/// fixed reply
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPresenter {
    pub auto_confirm: bool,
}

#[async_trait]
impl Presenter for LogPresenter {
    fn present(&self, dialog: Dialog) {
        tracing::warn!(?dialog, "dialog");
    }

    async fn confirm(&self, dialog: Dialog) -> bool {
        tracing::info!(?dialog, answer = self.auto_confirm, "confirmation");
        self.auto_confirm
    }

    fn close_active(&self) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str) {
        tracing::info!(route, "navigate");
    }
}
