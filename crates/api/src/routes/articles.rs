//! Route definitions for the `/articles` resource.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::articles;
use crate::state::AppState;

/// Routes mounted at `/articles`.
///
/// ```text
/// POST /      -> create_article
/// PUT  /{id}  -> update_article
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(articles::create_article))
        .route("/{id}", put(articles::update_article))
}
