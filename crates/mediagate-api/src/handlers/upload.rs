use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use mediagate_core::{generate_asset_id, AppError};
use mediagate_storage::UploadOptions;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_file, NO_FILE_MESSAGE};

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    /// Secure delivery URL assigned by the remote store
    pub url: String,
    /// Identifier to pass to `DELETE /files/{id}`
    pub public_id: String,
}

/// Upload file handler
///
/// Buffers the `file` part in memory and forwards it to the remote store in a single
/// attempt, under a generated `<unix-millis>-<suffix>` identifier. The original filename
/// travels as metadata only.
///
/// # Errors
/// - `AppError::InvalidInput` - no `file` part (the remote store is not called)
/// - `AppError::PayloadTooLarge` - body exceeds the configured transport limit
/// - `AppError::Upstream` - the remote store rejected the upload; message passed through
#[utoipa::path(
    post,
    path = "/upload",
    tag = "files",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded successfully", body = UploadResponse),
        (status = 400, description = "No file uploaded", body = ErrorResponse),
        (status = 500, description = "Remote store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_file"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(rejection = %rejection, "Upload request is not multipart");
        AppError::InvalidInput(NO_FILE_MESSAGE.to_string())
    })?;

    let payload = extract_multipart_file(multipart).await?;

    let options = UploadOptions {
        folder: state.config.media_folder.clone(),
        public_id: generate_asset_id(),
    };

    tracing::info!(
        public_id = %options.public_id,
        content_type = %payload.content_type,
        original_filename = ?payload.original_filename,
        size_bytes = payload.len(),
        "Forwarding upload to remote store"
    );

    let uploaded = state.store.upload(payload, &options).await?;

    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        url: uploaded.secure_url,
        public_id: uploaded.public_id,
    }))
}
