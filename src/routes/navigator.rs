use crate::routes::route::Route;
use std::sync::Arc;
use tokio::sync::watch;

/// Publishes the latest navigation intent for the routing layer to act on.
#[derive(Clone)]
pub struct Navigator {
    tx: Arc<watch::Sender<Option<Route>>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn redirect(&self, route: Route) {
        tracing::debug!(route = %route, "Navigation requested");
        self.tx.send_replace(Some(route));
    }

    pub fn intent(&self) -> Option<Route> {
        *self.tx.borrow()
    }

    /// Returns and clears the pending intent.
    pub fn take_intent(&self) -> Option<Route> {
        self.tx.send_replace(None)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Route>> {
        self.tx.subscribe()
    }
}
