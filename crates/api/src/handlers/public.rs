//! Public, unauthenticated views of published content.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use notekeep_core::error::CoreError;
use notekeep_core::note_type::NOTE_TYPE_ARTICLE;
use notekeep_core::types::DbId;
use notekeep_db::models::note::NoteFilter;
use notekeep_db::repositories::NoteRepo;

use super::notes::with_categories;
use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/public/articles
///
/// Published articles, most recently updated first.
pub async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let filter = NoteFilter {
        note_type: Some(NOTE_TYPE_ARTICLE.to_string()),
        published_only: true,
        limit: params.limit,
        offset: params.offset,
        ..Default::default()
    };
    let articles = NoteRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: articles }))
}

/// GET /api/v1/public/articles/{id}
///
/// A published article with its categories. Drafts are reported as not found.
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let article = NoteRepo::find_published(&state.pool, id, Some(NOTE_TYPE_ARTICLE))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))?;

    Ok(Json(DataResponse {
        data: with_categories(&state.pool, article).await?,
    }))
}

/// GET /api/v1/public/wall
///
/// Every published note of any type.
pub async fn wall(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let filter = NoteFilter {
        published_only: true,
        limit: params.limit,
        offset: params.offset,
        ..Default::default()
    };
    let notes = NoteRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: notes }))
}
