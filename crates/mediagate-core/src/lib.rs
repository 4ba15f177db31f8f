//! Mediagate Core Library
//!
//! This crate provides the configuration, error types and transient request/response
//! models shared by the storage and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    generate_asset_id, AssetDescriptor, FileListResponse, ResourceKind, UploadedAsset,
    UploadedPayload,
};
