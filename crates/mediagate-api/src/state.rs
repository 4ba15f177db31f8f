//! Application state shared by all handlers.
//!
//! Built once at startup; nothing in it is mutated per request, so no locking is needed.

use mediagate_core::Config;
use mediagate_storage::RemoteMediaStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn RemoteMediaStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RemoteMediaStore>) -> Arc<Self> {
        Arc::new(Self { config, store })
    }
}
