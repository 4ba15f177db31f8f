use bytes::Bytes;
use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::Rng;

use crate::constants::ASSET_ID_SUFFIX_LEN;

/// File bytes received in an upload, held in memory for one request only.
#[derive(Debug, Clone)]
pub struct UploadedPayload {
    pub data: Bytes,
    pub content_type: String,
    pub original_filename: Option<String>,
}

impl UploadedPayload {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Generate a collision-resistant asset identifier: `<unix-millis>-<6 alphanumerics>`.
///
/// The original filename is deliberately not part of the identifier.
pub fn generate_asset_id() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ASSET_ID_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), suffix)
}
