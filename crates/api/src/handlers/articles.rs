//! Handlers for the `/articles` resource.
//!
//! Articles are notes with `note_type = article`: a title, a summary, an
//! HTML body in `full_content` and an optional preview image. Reading and
//! deleting them goes through `/notes`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use notekeep_core::error::CoreError;
use notekeep_core::note_type::{DEFAULT_BACKGROUND_COLOR, NOTE_TYPE_ARTICLE};
use notekeep_core::types::DbId;
use notekeep_db::models::note::{CreateNote, UpdateNote};
use notekeep_db::repositories::NoteRepo;
use serde::Deserialize;

use super::notes::{resolve_category_ids, with_categories, CategorySelection};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /articles` and `PUT /articles/{id}`.
#[derive(Debug, Deserialize)]
pub struct ArticleRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub full_content: Option<String>,
    pub preview_image: Option<String>,
    pub tags: Option<String>,
    pub background_color: Option<String>,
    pub is_published: Option<bool>,
    pub categories: Option<CategorySelection>,
}

fn article_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Article",
        id,
    })
}

/// POST /api/v1/articles
///
/// `title` is required.
pub async fn create_article(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ArticleRequest>,
) -> AppResult<impl IntoResponse> {
    let title = input
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("Article title is required".into())))?;

    let category_ids = match input.categories {
        Some(selection) => resolve_category_ids(&state.pool, selection).await?,
        None => Vec::new(),
    };

    let create = CreateNote {
        title: Some(title),
        content: None,
        full_content: input.full_content,
        summary: input.summary,
        note_type: NOTE_TYPE_ARTICLE.to_string(),
        tags: input.tags,
        background_color: input
            .background_color
            .unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_string()),
        image_filename: None,
        preview_image: input.preview_image,
        is_published: input.is_published.unwrap_or(false),
        category_ids,
    };
    let note = NoteRepo::create(&state.pool, admin.user_id, &create).await?;

    tracing::info!(
        note_id = note.id,
        user_id = admin.user_id,
        published = note.is_published,
        "Article created",
    );

    let body = with_categories(&state.pool, note).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: body })))
}

/// PUT /api/v1/articles/{id}
///
/// Partial update of an article owned by the caller. Other note types are
/// reported as not found.
pub async fn update_article(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ArticleRequest>,
) -> AppResult<impl IntoResponse> {
    let existing = NoteRepo::find_owned(&state.pool, id, admin.user_id)
        .await?
        .filter(|n| n.note_type == NOTE_TYPE_ARTICLE)
        .ok_or_else(|| article_not_found(id))?;

    if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "Article title must not be blank".into(),
        )));
    }

    let category_ids = match input.categories {
        Some(selection) => Some(resolve_category_ids(&state.pool, selection).await?),
        None => None,
    };

    let update = UpdateNote {
        title: input.title.map(|t| t.trim().to_string()),
        full_content: input.full_content,
        summary: input.summary,
        tags: input.tags,
        background_color: input.background_color,
        preview_image: input.preview_image,
        is_published: input.is_published,
        category_ids,
        ..Default::default()
    };
    let note = NoteRepo::update(&state.pool, existing.id, admin.user_id, &update)
        .await?
        .ok_or_else(|| article_not_found(id))?;

    tracing::info!(note_id = id, user_id = admin.user_id, "Article updated");

    Ok(Json(DataResponse {
        data: with_categories(&state.pool, note).await?,
    }))
}
