//! Catalog change notifications
//!
//! The engine reports catalog changes through an injected [`CatalogObserver`]
//! instead of a process-wide dispatcher. Delivery is fire-and-forget with no
//! ordering guarantee relative to other emitters.

use std::sync::{Arc, Mutex, PoisonError};

use shared::CatalogEvent;
use tokio::sync::mpsc;

/// Receives catalog events
pub trait CatalogObserver: Send + Sync {
    /// Must not block
    fn notify(&self, event: CatalogEvent);
}

/// Fan-out observer with one unbounded queue per subscriber.
///
/// Every live subscriber receives every event, however far behind it is.
/// Subscribers that dropped their receiver are pruned on the next `notify`.
#[derive(Debug, Clone, Default)]
pub struct BroadcastBus {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<CatalogEvent>>>>,
}

impl BroadcastBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<CatalogEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        receiver
    }

    /// Subscribers whose receiver is still alive
    pub fn receiver_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|sender| !sender.is_closed())
            .count()
    }
}

impl CatalogObserver for BroadcastBus {
    fn notify(&self, event: CatalogEvent) {
        tracing::debug!(origin = %event.origin(), "catalog changed");
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
    }
}
