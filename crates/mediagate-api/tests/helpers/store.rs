//! In-memory stand-in for the remote media store.

use async_trait::async_trait;
use chrono::Utc;
use mediagate_core::{AssetDescriptor, ResourceKind, UploadedAsset, UploadedPayload};
use mediagate_storage::{RemoteMediaStore, StoreError, StoreResult, UploadOptions};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore};

#[derive(Default)]
pub struct InMemoryStore {
    assets: Mutex<Vec<AssetDescriptor>>,
    upload_error: Mutex<Option<String>>,
    failing_list_kind: Mutex<Option<ResourceKind>>,
    destroy_error: Mutex<Option<String>>,
    list_gate: Mutex<Option<Arc<Semaphore>>>,
    /// Signalled each time a listing call reaches the store.
    pub list_entered: Notify,
    pub upload_calls: AtomicUsize,
    pub destroy_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub lookup_calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `count` assets of `kind` under `folder`, each `size` bytes.
    pub fn seed(&self, folder: &str, kind: ResourceKind, count: usize, size: u64) {
        let mut assets = self.assets.lock().unwrap();
        for i in 0..count {
            let public_id = format!("{}/seed-{}-{}", folder, kind, i);
            assets.push(descriptor(&public_id, kind, size, &format!("seed-{}", i)));
        }
    }

    pub fn fail_uploads_with(&self, message: &str) {
        *self.upload_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_listing(&self, kind: ResourceKind) {
        *self.failing_list_kind.lock().unwrap() = Some(kind);
    }

    pub fn fail_destroys_with(&self, message: &str) {
        *self.destroy_error.lock().unwrap() = Some(message.to_string());
    }

    /// Make listing calls wait until [`InMemoryStore::release_listing`] is called.
    pub fn hold_listing(&self) {
        *self.list_gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_listing(&self) {
        if let Some(gate) = self.list_gate.lock().unwrap().as_ref() {
            gate.add_permits(1);
        }
    }

    pub fn contains(&self, public_id: &str) -> bool {
        self.assets
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.public_id == public_id)
    }

    pub fn calls(&self, counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.calls(&self.upload_calls)
            + self.calls(&self.destroy_calls)
            + self.calls(&self.list_calls)
            + self.calls(&self.lookup_calls)
    }
}

fn descriptor(public_id: &str, kind: ResourceKind, size: u64, filename: &str) -> AssetDescriptor {
    AssetDescriptor {
        public_id: public_id.to_string(),
        url: format!("https://res.example.com/test-cloud/{}/upload/{}", kind, public_id),
        format: None,
        resource_type: kind,
        size,
        width: None,
        height: None,
        original_filename: filename.to_string(),
        created_at: Utc::now(),
    }
}

fn detect_kind(content_type: &str) -> ResourceKind {
    if content_type.starts_with("image/") {
        ResourceKind::Image
    } else if content_type.starts_with("video/") {
        ResourceKind::Video
    } else {
        ResourceKind::Raw
    }
}

#[async_trait]
impl RemoteMediaStore for InMemoryStore {
    async fn upload(
        &self,
        payload: UploadedPayload,
        options: &UploadOptions,
    ) -> StoreResult<UploadedAsset> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.upload_error.lock().unwrap().clone() {
            return Err(StoreError::Api {
                status: 400,
                message,
            });
        }

        let kind = detect_kind(&payload.content_type);
        let public_id = format!("{}/{}", options.folder, options.public_id);
        let filename = payload
            .original_filename
            .clone()
            .unwrap_or_else(|| options.public_id.clone());
        let asset = descriptor(&public_id, kind, payload.len() as u64, &filename);
        let uploaded = UploadedAsset {
            public_id: asset.public_id.clone(),
            secure_url: asset.url.clone(),
            resource_type: kind,
        };
        self.assets.lock().unwrap().push(asset);
        Ok(uploaded)
    }

    async fn destroy(&self, public_id: &str, kind: ResourceKind) -> StoreResult<()> {
        self.destroy_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.destroy_error.lock().unwrap().clone() {
            return Err(StoreError::Api {
                status: 500,
                message,
            });
        }

        let mut assets = self.assets.lock().unwrap();
        let position = assets
            .iter()
            .position(|a| a.public_id == public_id && a.resource_type == kind)
            .ok_or_else(|| StoreError::NotFound(public_id.to_string()))?;
        assets.remove(position);
        Ok(())
    }

    async fn list_by_kind(
        &self,
        kind: ResourceKind,
        prefix: &str,
        max_results: u32,
    ) -> StoreResult<Vec<AssetDescriptor>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.list_entered.notify_one();
        let gate = self.list_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        }
        if *self.failing_list_kind.lock().unwrap() == Some(kind) {
            return Err(StoreError::Api {
                status: 420,
                message: format!("Rate limit exceeded listing {}", kind),
            });
        }

        Ok(self
            .assets
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.resource_type == kind && a.public_id.starts_with(prefix))
            .take(max_results as usize)
            .cloned()
            .collect())
    }

    async fn get_kind_by_id(&self, public_id: &str) -> StoreResult<ResourceKind> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.assets
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.public_id == public_id)
            .map(|a| a.resource_type)
            .ok_or_else(|| StoreError::NotFound(public_id.to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "in-memory"
    }
}
