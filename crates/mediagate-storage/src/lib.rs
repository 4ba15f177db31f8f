//! Mediagate Storage Library
//!
//! This crate provides the remote media store abstraction and its Cloudinary
//! implementation.
//!
//! # Identifier format
//!
//! Uploads are placed in a fixed folder, so the identifiers handed back by the
//! provider are folder-qualified: `{folder}/{unix-millis}-{suffix}`. They are used
//! verbatim as keys for lookup and delete.

pub mod cloudinary;
pub mod factory;
pub(crate) mod signing;
pub mod traits;

// Re-export commonly used types
pub use cloudinary::CloudinaryStore;
pub use factory::create_store;
pub use traits::{RemoteMediaStore, StoreError, StoreResult, UploadOptions};
