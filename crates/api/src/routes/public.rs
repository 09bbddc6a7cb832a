//! Route definitions for unauthenticated views.

use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at `/public`.
///
/// ```text
/// GET /articles       -> list_articles
/// GET /articles/{id}  -> get_article
/// GET /wall           -> wall
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/articles", get(public::list_articles))
        .route("/articles/{id}", get(public::get_article))
        .route("/wall", get(public::wall))
}
