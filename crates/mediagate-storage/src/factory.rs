use crate::{CloudinaryStore, RemoteMediaStore, StoreResult};
use mediagate_core::Config;
use std::sync::Arc;

/// Create the remote media store from configuration
pub fn create_store(config: &Config) -> StoreResult<Arc<dyn RemoteMediaStore>> {
    let store = CloudinaryStore::new(config.provider.clone())?;
    tracing::info!(
        provider = store.provider_name(),
        cloud_name = %config.provider.cloud_name,
        base_url = %config.provider.base_url,
        "Remote media store configured"
    );
    Ok(Arc::new(store))
}
