//! Handlers for the `/tasks` resource. Any authenticated user manages
//! their own tasks.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use notekeep_core::datetime::parse_optional_datetime;
use notekeep_core::error::CoreError;
use notekeep_core::priority::{is_valid_priority, PRIORITY_NORMAL};
use notekeep_core::types::DbId;
use notekeep_db::models::task::{CreateTask, UpdateTask};
use notekeep_db::repositories::TaskRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /tasks` and `PUT /tasks/{id}`.
///
/// `due_date` takes `YYYY-MM-DDTHH:MM` (or RFC 3339). On update an absent
/// field is kept and an empty string clears `due_date` / `description`.
#[derive(Debug, Default, Deserialize)]
pub struct TaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
}

fn task_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Task", id })
}

fn required_title(title: Option<&str>) -> AppResult<String> {
    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Core(CoreError::Validation("Task title is required".into())))
}

fn checked_priority(priority: &str) -> AppResult<String> {
    if !is_valid_priority(priority) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid priority '{priority}'. Expected low, normal or high"
        ))));
    }
    Ok(priority.to_string())
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// GET /api/v1/tasks
///
/// Earliest due date first (undated last), then high priority first.
pub async fn list_tasks(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tasks = TaskRepo::list(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/v1/tasks
pub async fn create_task(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<TaskRequest>,
) -> AppResult<impl IntoResponse> {
    let create = CreateTask {
        title: required_title(input.title.as_deref())?,
        description: input.description.and_then(non_blank),
        due_date: parse_optional_datetime("due_date", input.due_date.as_deref())?,
        priority: checked_priority(input.priority.as_deref().unwrap_or(PRIORITY_NORMAL))?,
    };
    let task = TaskRepo::create(&state.pool, user.user_id, &create).await?;

    tracing::info!(task_id = task.id, user_id = user.user_id, "Task created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks/{id}
pub async fn get_task(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let task = TaskRepo::find_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| task_not_found(id))?;
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/tasks/{id}
pub async fn update_task(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<TaskRequest>,
) -> AppResult<impl IntoResponse> {
    let existing = TaskRepo::find_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| task_not_found(id))?;

    let mut changes = UpdateTask::from(&existing);
    if input.title.is_some() {
        changes.title = required_title(input.title.as_deref())?;
    }
    if let Some(description) = input.description {
        changes.description = non_blank(description);
    }
    if input.due_date.is_some() {
        changes.due_date = parse_optional_datetime("due_date", input.due_date.as_deref())?;
    }
    if let Some(ref priority) = input.priority {
        changes.priority = checked_priority(priority)?;
    }
    if let Some(completed) = input.completed {
        changes.completed = completed;
    }

    let task = TaskRepo::update(&state.pool, id, user.user_id, &changes)
        .await?
        .ok_or_else(|| task_not_found(id))?;

    tracing::info!(
        task_id = id,
        user_id = user.user_id,
        completed = task.completed,
        "Task updated",
    );

    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete_task(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TaskRepo::delete(&state.pool, id, user.user_id).await? {
        return Err(task_not_found(id));
    }
    tracing::info!(task_id = id, user_id = user.user_id, "Task deleted");
    Ok(StatusCode::NO_CONTENT)
}
