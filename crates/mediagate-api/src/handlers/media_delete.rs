use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use mediagate_core::AppError;
use mediagate_storage::StoreError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::health::MessageResponse;
use crate::state::AppState;

const DELETE_FAILED: &str = "Failed to delete file";

fn delete_failed(err: StoreError) -> HttpAppError {
    HttpAppError(AppError::UpstreamOperation {
        operation: DELETE_FAILED.to_string(),
        details: err.message(),
    })
}

/// Delete file handler
///
/// The identifier is captured greedily because provider ids are folder-qualified
/// (`media-uploader/1700000000000-a1B2c3`). The asset's resource kind is looked up first
/// since the provider only deletes when the kind matches.
#[utoipa::path(
    delete,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = String, Path, description = "Asset identifier as returned by upload; may contain '/'")
    ),
    responses(
        (status = 200, description = "File deleted successfully", body = MessageResponse),
        (status = 500, description = "Lookup or delete failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_file"))]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, HttpAppError> {
    let kind = state.store.get_kind_by_id(&id).await.map_err(delete_failed)?;
    state.store.destroy(&id, kind).await.map_err(delete_failed)?;

    tracing::info!(public_id = %id, resource_type = %kind, "File deleted");

    Ok(Json(MessageResponse::new("File deleted successfully")))
}
