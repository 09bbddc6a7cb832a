//! Route definitions for the `/categories` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET    /      -> list_categories
/// POST   /      -> create_category
/// GET    /{id}  -> get_category
/// PUT    /{id}  -> rename_category
/// DELETE /{id}  -> delete_category (detaches notes first)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/{id}",
            get(categories::get_category)
                .put(categories::rename_category)
                .delete(categories::delete_category),
        )
}
