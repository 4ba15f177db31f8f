//! Route configuration and setup

use crate::api_doc::openapi_json;
use crate::handlers;
use crate::middleware::{origin_guard_middleware, OriginPolicy};
use crate::state::AppState;
use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use mediagate_core::Config;
use std::sync::Arc;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Setup all application routes
///
/// Layer order, outermost first: trace, origin guard, CORS, concurrency limit. The
/// origin guard therefore refuses foreign origins before CORS or any handler runs.
/// `Router::layer` wraps each route separately, so the concurrency cap uses one
/// shared semaphore to stay server-wide.
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    let origins = parse_origins(config)?;
    let cors = setup_cors(origins.clone());
    let origin_policy = Arc::new(OriginPolicy::new(origins));

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit,
        max_upload_size_bytes = config.max_upload_size_bytes,
        allowed_origins = %config.cors_origins.join(","),
        "Routes configured"
    );

    let app = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::liveness))
        .route("/openapi.json", get(openapi_json))
        .route("/upload", post(handlers::upload::upload_file))
        .route("/files", get(handlers::media_list::list_files))
        .route("/files/{*id}", delete(handlers::media_delete::delete_file))
        .layer(DefaultBodyLimit::max(config.max_upload_size_bytes))
        .layer(GlobalConcurrencyLimitLayer::new(config.http_concurrency_limit))
        .layer(cors)
        .layer(axum::middleware::from_fn_with_state(
            origin_policy,
            origin_guard_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn parse_origins(config: &Config) -> Result<Vec<HeaderValue>, anyhow::Error> {
    config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect()
}

/// Setup CORS configuration
///
/// Credentials are allowed, so headers are mirrored rather than wildcarded.
fn setup_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
