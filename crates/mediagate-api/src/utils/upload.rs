use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use mediagate_core::{AppError, UploadedPayload};

/// Multipart field carrying the upload.
pub const FILE_FIELD: &str = "file";

pub const NO_FILE_MESSAGE: &str = "No file uploaded";

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Extract the single `file` part from a multipart request into memory.
///
/// Other fields are ignored, and so is a `file` field sent without a filename: only a
/// file part counts as an upload. A missing file part or a second one is a client error.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<UploadedPayload, AppError> {
    let mut payload: Option<UploadedPayload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(original_filename) = field.file_name().map(|s| s.to_string()) else {
            tracing::debug!("Ignoring 'file' text field without a filename");
            continue;
        };
        if payload.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let content_type = field
            .content_type()
            .map(normalize_mime_type)
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(multipart_error)?;

        payload = Some(UploadedPayload {
            data,
            content_type,
            original_filename: Some(original_filename),
        });
    }

    payload.ok_or_else(|| AppError::InvalidInput(NO_FILE_MESSAGE.to_string()))
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}
