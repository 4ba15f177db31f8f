use axum::http::{header::ORIGIN, HeaderValue};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use mediagate_core::AppError;
use std::sync::Arc;

use crate::error::HttpAppError;

pub const CORS_REJECTION_MESSAGE: &str = "Not allowed by CORS";

/// Browser origins allowed to reach the handlers
#[derive(Clone, Debug)]
pub struct OriginPolicy {
    allowed: Vec<HeaderValue>,
}

impl OriginPolicy {
    pub fn new(allowed: Vec<HeaderValue>) -> Self {
        Self { allowed }
    }

    /// Requests without an Origin header (curl, server-to-server) are always permitted.
    pub fn permits(&self, origin: Option<&HeaderValue>) -> bool {
        match origin {
            None => true,
            Some(origin) => self.allowed.iter().any(|allowed| allowed == origin),
        }
    }
}

/// Origin guard middleware
///
/// Rejects requests from browser origins outside the allow-list before any handler
/// logic runs, including preflights. The CORS layer only decorates responses; this is
/// what actually refuses the request.
pub async fn origin_guard_middleware(
    State(policy): State<Arc<OriginPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(ORIGIN);
    if !policy.permits(origin) {
        tracing::warn!(
            origin = ?origin,
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected request from disallowed origin"
        );
        return HttpAppError(AppError::Forbidden(CORS_REJECTION_MESSAGE.to_string()))
            .into_response();
    }

    next.run(request).await
}
