//! Shared constants.

/// Folder that uploads land in and listings are restricted to, unless `MEDIA_FOLDER` overrides it.
pub const DEFAULT_MEDIA_FOLDER: &str = "media-uploader";

/// Origins allowed to call the service from a browser, unless `CORS_ORIGINS` overrides them.
pub const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "https://jmandmj.vercel.app",
    "https://media-uploader-backend.vercel.app",
    "http://localhost:3001",
    "http://localhost:5173",
];

pub const DEFAULT_PORT: u16 = 5000;

pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.cloudinary.com";

/// Per-kind listing size used when the client sends no `max_results`.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Hard cap the provider applies to a single listing page.
pub const MAX_RESULTS_CAP: u32 = 500;

/// Length of the random suffix in generated asset identifiers.
pub const ASSET_ID_SUFFIX_LEN: usize = 6;
