use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The remote store's classification of an asset.
///
/// Deletes must name the right kind: destroying with the wrong one is a silent no-op
/// on the provider side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Video,
    /// Anything the provider did not detect as image or video.
    Raw,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Video => "video",
            ResourceKind::Raw => "raw",
        }
    }

    /// Kinds covered by the file listing, in response order.
    pub fn listed() -> [ResourceKind; 2] {
        [ResourceKind::Image, ResourceKind::Video]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" => Ok(ResourceKind::Image),
            "video" => Ok(ResourceKind::Video),
            "raw" => Ok(ResourceKind::Raw),
            other => Err(format!("Unknown resource kind: {}", other)),
        }
    }
}

/// What the remote store reports about one stored asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AssetDescriptor {
    pub public_id: String,
    /// Secure (https) delivery URL
    pub url: String,
    pub format: Option<String>,
    pub resource_type: ResourceKind,
    /// Size in bytes
    pub size: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub original_filename: String,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UploadedAsset {
    /// Provider-assigned identifier, reusable unmodified for delete
    pub public_id: String,
    pub secure_url: String,
    pub resource_type: ResourceKind,
}

/// Body of `GET /files`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileListResponse {
    pub files: Vec<AssetDescriptor>,
    #[serde(rename = "totalFiles")]
    pub total_files: usize,
    #[serde(rename = "totalSize")]
    pub total_size: u64,
}

impl FileListResponse {
    /// Totals are always computed over exactly the files returned.
    pub fn from_files(files: Vec<AssetDescriptor>) -> Self {
        let total_size = files.iter().map(|f| f.size).sum();
        Self {
            total_files: files.len(),
            total_size,
            files,
        }
    }
}
