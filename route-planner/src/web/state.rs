//! Application state for the web layer.

use std::sync::Arc;

use crate::mbta::NetworkSource;
use crate::query::CoarseRouter;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Builds and keeps the route network for each policy
    pub router: Arc<CoarseRouter<NetworkSource>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(router: CoarseRouter<NetworkSource>) -> Self {
        Self {
            router: Arc::new(router),
        }
    }
}
