//! Handlers for the `/categories` resource (admin only).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use notekeep_core::error::CoreError;
use notekeep_core::types::DbId;
use notekeep_db::models::category::CategoryInput;
use notekeep_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted category name.
const MAX_NAME_LEN: usize = 100;

fn category_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    })
}

/// Trimmed, non-blank name of at most [`MAX_NAME_LEN`] characters.
fn clean_name(input: &CategoryInput) -> AppResult<&str> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Category name must not be blank".into(),
        )));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Category name must be at most {MAX_NAME_LEN} characters"
        ))));
    }
    Ok(name)
}

/// GET /api/v1/categories
pub async fn list_categories(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/categories
///
/// Duplicate names are rejected with 409 by the `uq_categories_name` constraint.
pub async fn create_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::create(&state.pool, clean_name(&input)?).await?;

    tracing::info!(
        category_id = category.id,
        user_id = admin.user_id,
        "Category created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/categories/{id}
pub async fn get_category(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| category_not_found(id))?;
    Ok(Json(DataResponse { data: category }))
}

/// PUT /api/v1/categories/{id}
pub async fn rename_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CategoryInput>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::rename(&state.pool, id, clean_name(&input)?)
        .await?
        .ok_or_else(|| category_not_found(id))?;

    tracing::info!(category_id = id, user_id = admin.user_id, "Category renamed");

    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Removes the category from every note that carries it, then deletes it,
/// all in one transaction. Responds with the ids of the affected notes.
pub async fn delete_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deletion = CategoryRepo::delete_detaching_notes(&state.pool, id)
        .await?
        .ok_or_else(|| category_not_found(id))?;

    tracing::info!(
        category_id = id,
        user_id = admin.user_id,
        detached_notes = deletion.detached_note_ids.len(),
        "Category deleted",
    );

    Ok(Json(DataResponse { data: deletion }))
}
