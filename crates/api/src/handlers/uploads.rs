//! Image upload handler.
//!
//! Files land in the configured upload directory and are served back from
//! `/uploads/<name>` by the static file service in the router.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use notekeep_core::uploads::{is_allowed_image, secure_filename, ALLOWED_IMAGE_EXTENSIONS};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// URL prefix uploaded files are served under.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Response body of `POST /uploads`, in the shape rich-text editors expect.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub location: String,
}

/// POST /api/v1/uploads
///
/// Multipart form with a `file` field holding a png, jpg, jpeg or gif image.
/// The stored name is the sanitised client filename behind a random prefix.
pub async fn upload_image(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let max_bytes = state.config.max_upload_bytes;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            if data.len() + chunk.len() > max_bytes {
                return Err(AppError::PayloadTooLarge(format!(
                    "File exceeds the {max_bytes} byte upload limit"
                )));
            }
            data.extend_from_slice(&chunk);
        }
        upload = Some((filename, data));
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let safe_name = secure_filename(&filename)
        .filter(|name| is_allowed_image(name))
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unsupported file '{filename}'. Allowed: {}",
                ALLOWED_IMAGE_EXTENSIONS.join(", ")
            ))
        })?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    let stored_name = format!("{}_{safe_name}", Uuid::new_v4().simple());

    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    tokio::fs::write(state.config.upload_dir.join(&stored_name), &data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    tracing::info!(
        user_id = admin.user_id,
        file = %stored_name,
        bytes = data.len(),
        "Image uploaded",
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            location: format!("{UPLOADS_URL_PREFIX}/{stored_name}"),
        }),
    ))
}
