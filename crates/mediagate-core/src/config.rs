//! Configuration module
//!
//! Process-wide configuration is read once at startup and handed to the application
//! state; handlers never consult the environment themselves.

use std::env;
use std::fmt;

use crate::constants::{
    DEFAULT_CORS_ORIGINS, DEFAULT_MEDIA_FOLDER, DEFAULT_PORT, DEFAULT_PROVIDER_BASE_URL,
};

const MAX_UPLOAD_SIZE_MB: usize = 100;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Credentials and endpoint for the remote media store account.
#[derive(Clone)]
pub struct ProviderCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub log_format: String,
    pub media_folder: String,
    pub max_upload_size_bytes: usize,
    pub http_concurrency_limit: usize,
    pub provider: ProviderCredentials,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let server_port = match var("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let cors_origins = match var("CORS_ORIGINS") {
            Some(origins) => origins
                .split(',')
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let max_upload_size_mb = var("MAX_UPLOAD_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let config = Config {
            server_port,
            cors_origins,
            environment,
            log_format: var("LOG_FORMAT")
                .unwrap_or_else(|| "compact".to_string())
                .to_lowercase(),
            media_folder: var("MEDIA_FOLDER")
                .map(|f| f.trim_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_MEDIA_FOLDER.to_string()),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            http_concurrency_limit: var("HTTP_CONCURRENCY_LIMIT")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
            provider: ProviderCredentials {
                cloud_name: var("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
                api_key: var("CLOUDINARY_API_KEY").unwrap_or_default(),
                api_secret: var("CLOUDINARY_API_SECRET").unwrap_or_default(),
                base_url: var("CLOUDINARY_API_BASE_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_PROVIDER_BASE_URL.to_string()),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.provider.cloud_name.is_empty() {
            return Err(anyhow::anyhow!("CLOUDINARY_CLOUD_NAME must be set"));
        }
        if self.provider.api_key.is_empty() {
            return Err(anyhow::anyhow!("CLOUDINARY_API_KEY must be set"));
        }
        if self.provider.api_secret.is_empty() {
            return Err(anyhow::anyhow!("CLOUDINARY_API_SECRET must be set"));
        }
        if self.media_folder.is_empty() {
            return Err(anyhow::anyhow!("MEDIA_FOLDER cannot be empty"));
        }
        if self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*'. Please specify explicit origins."
            ));
        }
        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB cannot be 0"));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Listing prefix covering everything uploads place in the media folder.
    pub fn asset_prefix(&self) -> String {
        format!("{}/", self.media_folder)
    }
}
