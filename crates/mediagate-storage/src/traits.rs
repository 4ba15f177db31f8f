//! Remote media store abstraction trait
//!
//! This module defines the narrow interface handlers use to talk to the provider, so
//! handler logic can be exercised against a substitute implementation.

use async_trait::async_trait;
use mediagate_core::{AssetDescriptor, ResourceKind, UploadedAsset, UploadedPayload};
use thiserror::Error;

/// Remote store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never produced a response (DNS, TLS, connection reset, ...)
    #[error("Request to remote store failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with an error status.
    #[error("Remote store returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unexpected response from remote store: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// The message to surface to clients. Provider errors pass through verbatim.
    pub fn message(&self) -> String {
        match self {
            StoreError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type for remote store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Placement of an upload in the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// Fixed collection the asset is placed under
    pub folder: String,
    /// Generated identifier, relative to `folder`
    pub public_id: String,
}

/// Remote media store trait
///
/// Every call is a single network round trip with no retry.
#[async_trait]
pub trait RemoteMediaStore: Send + Sync {
    /// Upload a payload, letting the provider detect its resource kind.
    ///
    /// The original filename is attached as metadata only.
    async fn upload(
        &self,
        payload: UploadedPayload,
        options: &UploadOptions,
    ) -> StoreResult<UploadedAsset>;

    /// Delete an asset. `kind` must match the asset's actual kind.
    async fn destroy(&self, public_id: &str, kind: ResourceKind) -> StoreResult<()>;

    /// List up to `max_results` assets of one kind whose identifier starts with `prefix`.
    async fn list_by_kind(
        &self,
        kind: ResourceKind,
        prefix: &str,
        max_results: u32,
    ) -> StoreResult<Vec<AssetDescriptor>>;

    /// Look up the resource kind of an existing asset.
    async fn get_kind_by_id(&self, public_id: &str) -> StoreResult<ResourceKind>;

    /// Provider name for logs
    fn provider_name(&self) -> &'static str;
}
