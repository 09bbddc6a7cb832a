//! Handlers for the `/notes` resource.
//!
//! Notes are owner-scoped and admin only. A note's categories can be sent
//! either as a JSON array of ids or as the comma-separated string form
//! (`"2,5,9"`); responses always carry `category_ids` in the string form.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use notekeep_core::category_ids::{self, CategoryIdsError};
use notekeep_core::error::CoreError;
use notekeep_core::note_type::{is_valid_note_type, DEFAULT_BACKGROUND_COLOR, NOTE_TYPE_NOTE};
use notekeep_core::tags::collect_tags;
use notekeep_core::types::DbId;
use notekeep_db::models::category::Category;
use notekeep_db::models::note::{CreateNote, Note, NoteFilter, NoteWithCategories, UpdateNote};
use notekeep_db::repositories::{CategoryRepo, NoteRepo};
use notekeep_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Category selection as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategorySelection {
    /// `[2, 5, 9]`
    Ids(Vec<DbId>),
    /// `"2,5,9"` (form-style)
    Encoded(String),
}

impl CategorySelection {
    /// Ordered ids, rejecting malformed or non-positive entries.
    pub fn into_ids(self) -> Result<Vec<DbId>, CategoryIdsError> {
        match self {
            CategorySelection::Encoded(raw) => category_ids::decode(Some(&raw)),
            CategorySelection::Ids(ids) => {
                if let Some(position) = ids.iter().position(|id| *id <= 0) {
                    return Err(CategoryIdsError::Malformed {
                        segment: ids[position].to_string(),
                        position,
                    });
                }
                Ok(ids)
            }
        }
    }
}

/// Request body for `POST /notes` and `PUT /notes/{id}`.
///
/// On update, absent fields are left unchanged; `categories: []` or `""`
/// clears the note's categories.
#[derive(Debug, Default, Deserialize)]
pub struct NoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub full_content: Option<String>,
    pub summary: Option<String>,
    pub note_type: Option<String>,
    pub tags: Option<String>,
    pub background_color: Option<String>,
    pub image_filename: Option<String>,
    pub preview_image: Option<String>,
    pub is_published: Option<bool>,
    pub categories: Option<CategorySelection>,
}

/// Query parameters for `GET /notes`.
#[derive(Debug, Default, Deserialize)]
pub struct NoteListParams {
    /// Exact category membership.
    pub category: Option<DbId>,
    pub search: Option<String>,
    pub tag: Option<String>,
    pub note_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Payload of `GET /notes`.
#[derive(Debug, Serialize)]
pub struct NoteListing {
    pub notes: Vec<Note>,
    /// Every category, for filter menus.
    pub categories: Vec<Category>,
    /// Distinct tags of the listed notes, sorted.
    pub all_tags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Shared helpers (also used by articles and public views)
// ---------------------------------------------------------------------------

/// Turn a submitted selection into ids that all name existing categories.
///
/// Repeated ids collapse to their first occurrence.
pub(crate) async fn resolve_category_ids(
    pool: &DbPool,
    selection: CategorySelection,
) -> AppResult<Vec<DbId>> {
    let ids = category_ids::dedup(&selection.into_ids().map_err(CoreError::from)?);

    let missing = CategoryRepo::find_missing(pool, &ids).await?;
    if let Some(encoded) = category_ids::encode(&missing) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown category ids: {encoded}"
        ))));
    }
    Ok(ids)
}

/// Attach a note's categories in assignment order.
pub(crate) async fn with_categories(pool: &DbPool, note: Note) -> AppResult<NoteWithCategories> {
    let categories = CategoryRepo::list_for_note(pool, note.id).await?;
    Ok(NoteWithCategories { note, categories })
}

pub(crate) fn validate_note_type(note_type: &str) -> AppResult<()> {
    if !is_valid_note_type(note_type) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid note_type '{note_type}'"
        ))));
    }
    Ok(())
}

fn note_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Note", id })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/notes
///
/// List the caller's notes, most recently updated first, with optional
/// `category`, `search`, `tag` and `note_type` filters. An unknown
/// `category` is a 404. `all_tags` covers the listed notes only.
pub async fn list_notes(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<NoteListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(category_id) = params.category {
        if CategoryRepo::find_by_id(&state.pool, category_id).await?.is_none() {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Category",
                id: category_id,
            }));
        }
    }

    let filter = NoteFilter {
        owner_id: Some(admin.user_id),
        category_id: params.category,
        search: params.search,
        tag: params.tag,
        note_type: params.note_type,
        published_only: false,
        limit: params.limit,
        offset: params.offset,
    };
    let notes = NoteRepo::list(&state.pool, &filter).await?;
    let categories = CategoryRepo::list(&state.pool).await?;
    let all_tags = collect_tags(notes.iter().map(|n| n.tags.as_deref()))
        .into_iter()
        .collect();

    Ok(Json(DataResponse {
        data: NoteListing {
            notes,
            categories,
            all_tags,
        },
    }))
}

/// POST /api/v1/notes
pub async fn create_note(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<NoteRequest>,
) -> AppResult<impl IntoResponse> {
    let note_type = input
        .note_type
        .unwrap_or_else(|| NOTE_TYPE_NOTE.to_string());
    validate_note_type(&note_type)?;

    let category_ids = match input.categories {
        Some(selection) => resolve_category_ids(&state.pool, selection).await?,
        None => Vec::new(),
    };

    let create = CreateNote {
        title: input.title,
        content: input.content,
        full_content: input.full_content,
        summary: input.summary,
        note_type,
        tags: input.tags,
        background_color: input
            .background_color
            .unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_string()),
        image_filename: input.image_filename,
        preview_image: input.preview_image,
        is_published: input.is_published.unwrap_or(false),
        category_ids,
    };
    let note = NoteRepo::create(&state.pool, admin.user_id, &create).await?;

    tracing::info!(
        note_id = note.id,
        user_id = admin.user_id,
        categories = note.category_ids.len(),
        "Note created",
    );

    let body = with_categories(&state.pool, note).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: body })))
}

/// GET /api/v1/notes/{id}
pub async fn get_note(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let note = NoteRepo::find_owned(&state.pool, id, admin.user_id)
        .await?
        .ok_or_else(|| note_not_found(id))?;

    Ok(Json(DataResponse {
        data: with_categories(&state.pool, note).await?,
    }))
}

/// PUT /api/v1/notes/{id}
///
/// Partial update. `categories`, when present, replaces the whole set.
pub async fn update_note(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<NoteRequest>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref note_type) = input.note_type {
        validate_note_type(note_type)?;
    }

    let category_ids = match input.categories {
        Some(selection) => Some(resolve_category_ids(&state.pool, selection).await?),
        None => None,
    };

    let update = UpdateNote {
        title: input.title,
        content: input.content,
        full_content: input.full_content,
        summary: input.summary,
        note_type: input.note_type,
        tags: input.tags,
        background_color: input.background_color,
        image_filename: input.image_filename,
        preview_image: input.preview_image,
        is_published: input.is_published,
        category_ids,
    };
    let note = NoteRepo::update(&state.pool, id, admin.user_id, &update)
        .await?
        .ok_or_else(|| note_not_found(id))?;

    tracing::info!(note_id = id, user_id = admin.user_id, "Note updated");

    Ok(Json(DataResponse {
        data: with_categories(&state.pool, note).await?,
    }))
}

/// DELETE /api/v1/notes/{id}
pub async fn delete_note(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !NoteRepo::delete(&state.pool, id, admin.user_id).await? {
        return Err(note_not_found(id));
    }

    tracing::info!(note_id = id, user_id = admin.user_id, "Note deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/wall
///
/// Every note of every user, most recently updated first.
pub async fn wall(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<crate::query::PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let filter = NoteFilter {
        limit: params.limit,
        offset: params.offset,
        ..Default::default()
    };
    let notes = NoteRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: notes }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn parse(json: &str) -> CategorySelection {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn selection_accepts_array_and_string() {
        assert_eq!(parse("[2, 5, 9]").into_ids().unwrap(), vec![2, 5, 9]);
        assert_eq!(parse("\"2,5,9\"").into_ids().unwrap(), vec![2, 5, 9]);
        assert!(parse("\"\"").into_ids().unwrap().is_empty());
        assert!(parse("[]").into_ids().unwrap().is_empty());
    }

    #[test]
    fn selection_rejects_bad_ids() {
        assert_matches!(
            parse("\"3,x\"").into_ids(),
            Err(CategoryIdsError::Malformed { position: 1, .. })
        );
        assert_matches!(
            parse("[4, 0]").into_ids(),
            Err(CategoryIdsError::Malformed { position: 1, .. })
        );
    }

    #[test]
    fn absent_categories_deserialize_to_none() {
        let req: NoteRequest = serde_json::from_str(r#"{"title": "t"}"#).unwrap();
        assert!(req.categories.is_none());
        assert_eq!(req.title.as_deref(), Some("t"));
    }

    #[test]
    fn note_type_is_checked() {
        assert!(validate_note_type("list").is_ok());
        assert_matches!(
            validate_note_type("memo"),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }
}
