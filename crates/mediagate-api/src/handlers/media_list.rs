use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use mediagate_core::constants::{DEFAULT_MAX_RESULTS, MAX_RESULTS_CAP};
use mediagate_core::{AppError, FileListResponse, ResourceKind};
use serde::{Deserialize, Deserializer};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListFilesQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_results: Option<u32>,
}

/// `?max_results=` with no value means the parameter was not given.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl ListFilesQuery {
    /// Per-kind cap: default 10, clamped to the provider's page limit.
    fn per_kind_limit(&self) -> Result<u32, AppError> {
        match self.max_results {
            None => Ok(DEFAULT_MAX_RESULTS),
            Some(0) => Err(AppError::InvalidInput(
                "max_results must be greater than 0".to_string(),
            )),
            Some(n) => Ok(n.min(MAX_RESULTS_CAP)),
        }
    }
}

/// List files handler
///
/// Queries images and videos under the upload folder independently, each capped at
/// `max_results`, so up to twice that many files can come back. Either query failing
/// fails the whole request.
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    params(
        ("max_results" = Option<u32>, Query, description = "Maximum results per resource kind (default 10)")
    ),
    responses(
        (status = 200, description = "Files under the upload folder", body = FileListResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Remote store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(operation = "list_files"))]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListFilesQuery>, QueryRejection>,
) -> Result<Json<FileListResponse>, HttpAppError> {
    let Query(query) = query?;
    let limit = query.per_kind_limit()?;
    let prefix = state.config.asset_prefix();
    let [first_kind, second_kind] = ResourceKind::listed();

    let (mut files, more) = tokio::try_join!(
        state.store.list_by_kind(first_kind, &prefix, limit),
        state.store.list_by_kind(second_kind, &prefix, limit),
    )?;
    files.extend(more);

    let response = FileListResponse::from_files(files);
    tracing::debug!(
        total_files = response.total_files,
        total_size = response.total_size,
        max_results = limit,
        "Files listed"
    );

    Ok(Json(response))
}
