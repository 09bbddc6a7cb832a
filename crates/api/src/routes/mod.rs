pub mod articles;
pub mod auth;
pub mod categories;
pub mod events;
pub mod health;
pub mod notes;
pub mod public;
pub mod tasks;
pub mod uploads;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register (public)
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
/// /auth/me                             current user (requires auth)
///
/// /notes                               list, create (admin)
/// /notes/{id}                          get, update, delete (admin)
/// /articles                            create (admin)
/// /articles/{id}                       update (admin)
/// /categories                          list, create (admin)
/// /categories/{id}                     get, rename, delete (admin)
/// /uploads                             upload image (admin)
/// /wall                                all notes of all users (admin)
///
/// /tasks                               list, create (requires auth)
/// /tasks/{id}                          get, update, delete (requires auth)
/// /events                              list, create (requires auth)
/// /events/calendar                     calendar feed (requires auth)
/// /events/{id}                         get, update, delete (requires auth)
///
/// /public/articles                     published articles
/// /public/articles/{id}                one published article
/// /public/wall                         published notes
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/notes", notes::router())
        .nest("/articles", articles::router())
        .nest("/categories", categories::router())
        .nest("/uploads", uploads::router())
        .route("/wall", get(handlers::notes::wall))
        .nest("/tasks", tasks::router())
        .nest("/events", events::router())
        .nest("/public", public::router())
}
