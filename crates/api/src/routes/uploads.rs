//! Route definitions for image uploads.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// Routes mounted at `/uploads`.
///
/// ```text
/// POST / -> upload_image (multipart)
/// ```
///
/// The default body limit is lifted here; the handler enforces
/// `MAX_UPLOAD_BYTES` while streaming.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(uploads::upload_image))
        .layer(DefaultBodyLimit::disable())
}
