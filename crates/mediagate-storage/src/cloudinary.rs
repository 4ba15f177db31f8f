use crate::signing::{escape_context_value, sign_params};
use crate::traits::{RemoteMediaStore, StoreError, StoreResult, UploadOptions};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use mediagate_core::config::ProviderCredentials;
use mediagate_core::{AssetDescriptor, ResourceKind, UploadedAsset, UploadedPayload};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

/// Cloudinary-backed remote media store
///
/// Uploads and deletes go through the signed upload API; listings and lookups go
/// through the Admin API with basic auth.
#[derive(Clone)]
pub struct CloudinaryStore {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
    resource_type: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    resources: Vec<ResourceRecord>,
}

#[derive(Debug, Deserialize)]
struct ResourceContext {
    #[serde(default)]
    custom: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ResourceRecord {
    public_id: String,
    #[serde(default)]
    format: Option<String>,
    resource_type: String,
    #[serde(default)]
    bytes: u64,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    secure_url: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    context: Option<ResourceContext>,
}

impl ResourceRecord {
    fn into_descriptor(self) -> AssetDescriptor {
        let original_filename = self
            .context
            .as_ref()
            .and_then(|ctx| ctx.custom.get("original_filename").cloned())
            .or(self.display_name)
            .unwrap_or_else(|| {
                self.public_id
                    .rsplit('/')
                    .next()
                    .unwrap_or(&self.public_id)
                    .to_string()
            });

        AssetDescriptor {
            resource_type: self.resource_type.parse().unwrap_or(ResourceKind::Raw),
            url: self.secure_url,
            format: self.format,
            size: self.bytes,
            width: self.width,
            height: self.height,
            original_filename,
            created_at: self.created_at,
            public_id: self.public_id,
        }
    }
}

impl CloudinaryStore {
    /// Create a new CloudinaryStore
    ///
    /// No explicit timeout is configured; calls inherit the HTTP client's defaults.
    pub fn new(credentials: ProviderCredentials) -> StoreResult<Self> {
        if credentials.cloud_name.is_empty()
            || credentials.api_key.is_empty()
            || credentials.api_secret.is_empty()
        {
            return Err(StoreError::Config(
                "cloud name, API key and API secret are all required".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("mediagate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        Ok(Self {
            http,
            cloud_name: credentials.cloud_name,
            api_key: credentials.api_key,
            api_secret: credentials.api_secret,
            base_url: credentials.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v1_1/{}/{}", self.base_url, self.cloud_name, path)
    }

    /// Add timestamp, signature and api key to upload-API parameters.
    fn signed_form(&self, mut params: BTreeMap<&'static str, String>) -> BTreeMap<&'static str, String> {
        params.insert("timestamp", Utc::now().timestamp().to_string());
        let signature = sign_params(&params, &self.api_secret);
        params.insert("signature", signature);
        params.insert("api_key", self.api_key.clone());
        params
    }

    /// POST a form to the upload API and decode the reply.
    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &BTreeMap<&'static str, String>,
    ) -> StoreResult<T> {
        let response = self.http.post(self.api_url(path)).form(form).send().await?;
        Self::parse_response(response).await
    }

    /// Decode a provider response, turning error statuses into [`StoreError::Api`].
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> StoreResult<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    /// Does `public_id` exist as an asset of `kind`?
    async fn exists_as(&self, public_id: &str, kind: ResourceKind) -> StoreResult<bool> {
        let encoded_id = public_id
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let url = self.api_url(&format!("resources/{}/upload/{}", kind, encoded_id));

        let response = self
            .http
            .get(url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::parse_response::<serde_json::Value>(response).await?;
        Ok(true)
    }
}

#[async_trait]
impl RemoteMediaStore for CloudinaryStore {
    async fn upload(
        &self,
        payload: UploadedPayload,
        options: &UploadOptions,
    ) -> StoreResult<UploadedAsset> {
        let start = Instant::now();
        let size = payload.len();

        let mut params = BTreeMap::new();
        params.insert("folder", options.folder.clone());
        params.insert("public_id", options.public_id.clone());
        if let Some(ref filename) = payload.original_filename {
            params.insert(
                "context",
                format!("original_filename={}", escape_context_value(filename)),
            );
        }
        let mut form = self.signed_form(params);
        form.insert(
            "file",
            format!(
                "data:{};base64,{}",
                payload.content_type,
                STANDARD.encode(&payload.data)
            ),
        );

        let result: StoreResult<UploadResponse> = self.post_form("auto/upload", &form).await;

        let uploaded = result.map_err(|e| {
            tracing::error!(
                error = %e,
                folder = %options.folder,
                public_id = %options.public_id,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Cloudinary upload failed"
            );
            e
        })?;

        tracing::info!(
            public_id = %uploaded.public_id,
            resource_type = %uploaded.resource_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloudinary upload successful"
        );

        Ok(UploadedAsset {
            resource_type: uploaded.resource_type.parse().unwrap_or(ResourceKind::Raw),
            public_id: uploaded.public_id,
            secure_url: uploaded.secure_url,
        })
    }

    async fn destroy(&self, public_id: &str, kind: ResourceKind) -> StoreResult<()> {
        let start = Instant::now();

        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        params.insert("invalidate", "true".to_string());
        let form = self.signed_form(params);

        let destroyed: DestroyResponse = self
            .post_form(&format!("{}/destroy", kind), &form)
            .await?;

        match destroyed.result.as_str() {
            "ok" => {
                tracing::info!(
                    public_id = %public_id,
                    resource_type = %kind,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Cloudinary destroy successful"
                );
                Ok(())
            }
            "not found" => Err(StoreError::NotFound(public_id.to_string())),
            other => Err(StoreError::InvalidResponse(format!(
                "destroy returned '{}'",
                other
            ))),
        }
    }

    async fn list_by_kind(
        &self,
        kind: ResourceKind,
        prefix: &str,
        max_results: u32,
    ) -> StoreResult<Vec<AssetDescriptor>> {
        let start = Instant::now();

        let response = self
            .http
            .get(self.api_url(&format!("resources/{}/upload", kind)))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .query(&[
                ("prefix", prefix.to_string()),
                ("max_results", max_results.to_string()),
                ("context", "true".to_string()),
            ])
            .send()
            .await?;
        let listed: ListResponse = Self::parse_response(response).await?;

        tracing::debug!(
            resource_type = %kind,
            prefix = %prefix,
            count = listed.resources.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloudinary listing fetched"
        );

        Ok(listed
            .resources
            .into_iter()
            .map(ResourceRecord::into_descriptor)
            .collect())
    }

    async fn get_kind_by_id(&self, public_id: &str) -> StoreResult<ResourceKind> {
        for kind in [ResourceKind::Image, ResourceKind::Video, ResourceKind::Raw] {
            if self.exists_as(public_id, kind).await? {
                return Ok(kind);
            }
        }
        Err(StoreError::NotFound(public_id.to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "cloudinary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use wiremock::matchers::{body_string_contains, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> CloudinaryStore {
        CloudinaryStore::new(ProviderCredentials {
            cloud_name: "demo".to_string(),
            api_key: "123456".to_string(),
            api_secret: "secret".to_string(),
            base_url: server.uri(),
        })
        .unwrap()
    }

    fn payload() -> UploadedPayload {
        UploadedPayload {
            data: Bytes::from_static(b"0123456789"),
            content_type: "image/jpeg".to_string(),
            original_filename: Some("holiday.jpg".to_string()),
        }
    }

    fn options() -> UploadOptions {
        UploadOptions {
            folder: "media-uploader".to_string(),
            public_id: "1700000000000-a1B2c3".to_string(),
        }
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let result = CloudinaryStore::new(ProviderCredentials {
            cloud_name: "demo".to_string(),
            api_key: String::new(),
            api_secret: "secret".to_string(),
            base_url: "https://api.cloudinary.com".to_string(),
        });
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[tokio::test]
    async fn test_upload_signed_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/demo/auto/upload"))
            .and(body_string_contains("signature="))
            .and(body_string_contains("api_key=123456"))
            .and(body_string_contains("folder=media-uploader"))
            .and(body_string_contains("public_id=1700000000000-a1B2c3"))
            .and(body_string_contains("original_filename%3Dholiday.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "public_id": "media-uploader/1700000000000-a1B2c3",
                "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/media-uploader/1700000000000-a1B2c3.jpg",
                "resource_type": "image",
                "bytes": 10
            })))
            .expect(1)
            .mount(&server)
            .await;

        let uploaded = store_for(&server).upload(payload(), &options()).await.unwrap();
        assert_eq!(uploaded.public_id, "media-uploader/1700000000000-a1B2c3");
        assert!(uploaded.secure_url.starts_with("https://"));
        assert_eq!(uploaded.resource_type, ResourceKind::Image);
    }

    #[tokio::test]
    async fn test_upload_error_message_passes_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/demo/auto/upload"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "message": "Invalid image file" }
            })))
            .mount(&server)
            .await;

        let err = store_for(&server)
            .upload(payload(), &options())
            .await
            .unwrap_err();
        match err {
            StoreError::Api { status, ref message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid image file");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
        assert_eq!(err.message(), "Invalid image file");
    }

    #[tokio::test]
    async fn test_list_by_kind_projects_resources() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1_1/demo/resources/video/upload"))
            .and(query_param("prefix", "media-uploader/"))
            .and(query_param("max_results", "5"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "resources": [
                    {
                        "public_id": "media-uploader/1-abcdef",
                        "format": "mp4",
                        "resource_type": "video",
                        "bytes": 2048,
                        "width": 640,
                        "height": 360,
                        "secure_url": "https://res.cloudinary.com/demo/video/upload/media-uploader/1-abcdef.mp4",
                        "created_at": "2024-05-01T12:00:00Z",
                        "context": { "custom": { "original_filename": "clip.mp4" } }
                    },
                    {
                        "public_id": "media-uploader/2-ghijkl",
                        "format": "mov",
                        "resource_type": "video",
                        "bytes": 10,
                        "secure_url": "https://res.cloudinary.com/demo/video/upload/media-uploader/2-ghijkl.mov",
                        "created_at": "2024-05-02T12:00:00Z"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let files = store_for(&server)
            .list_by_kind(ResourceKind::Video, "media-uploader/", 5)
            .await
            .unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].original_filename, "clip.mp4");
        assert_eq!(files[0].size, 2048);
        assert_eq!(files[0].width, Some(640));
        assert_eq!(files[0].resource_type, ResourceKind::Video);
        assert_eq!(files[1].original_filename, "2-ghijkl");
        assert_eq!(files[1].height, None);
    }

    #[tokio::test]
    async fn test_get_kind_tries_each_kind_until_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1_1/demo/resources/image/upload/media-uploader/1-abcdef"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": { "message": "Resource not found" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1_1/demo/resources/video/upload/media-uploader/1-abcdef"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "public_id": "media-uploader/1-abcdef",
                "resource_type": "video"
            })))
            .mount(&server)
            .await;

        let kind = store_for(&server)
            .get_kind_by_id("media-uploader/1-abcdef")
            .await
            .unwrap();
        assert_eq!(kind, ResourceKind::Video);
    }

    #[tokio::test]
    async fn test_get_kind_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = store_for(&server)
            .get_kind_by_id("media-uploader/missing")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_destroy_scoped_to_kind() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/demo/video/destroy"))
            .and(body_string_contains("signature="))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "result": "ok" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        store_for(&server)
            .destroy("media-uploader/1-abcdef", ResourceKind::Video)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_destroy_not_found_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/destroy"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "result": "not found" })),
            )
            .mount(&server)
            .await;

        let err = store_for(&server)
            .destroy("media-uploader/gone", ResourceKind::Image)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
