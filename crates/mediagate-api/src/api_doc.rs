use axum::Json;
use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use crate::handlers::health::MessageResponse;
use crate::handlers::upload::UploadResponse;
use mediagate_core::{AssetDescriptor, FileListResponse, ResourceKind};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mediagate API",
        description = "Upload, list and delete media stored with a remote media provider"
    ),
    paths(
        handlers::health::root,
        handlers::health::liveness,
        handlers::upload::upload_file,
        handlers::media_list::list_files,
        handlers::media_delete::delete_file,
    ),
    components(schemas(
        ErrorResponse,
        MessageResponse,
        UploadResponse,
        FileListResponse,
        AssetDescriptor,
        ResourceKind,
    )),
    tags(
        (name = "health", description = "Service status"),
        (name = "files", description = "Remote media files")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
