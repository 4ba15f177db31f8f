//! Transient request/response models
//!
//! Nothing here is persisted; every value lives for the duration of one request.

mod asset;
mod payload;

pub use asset::*;
pub use payload::*;
