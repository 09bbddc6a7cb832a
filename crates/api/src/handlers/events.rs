//! Handlers for the `/events` resource and the calendar feed.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use notekeep_core::datetime::{parse_datetime, parse_optional_datetime};
use notekeep_core::error::CoreError;
use notekeep_core::types::{DbId, Timestamp};
use notekeep_db::models::event::{CalendarEntry, CreateEvent, UpdateEvent};
use notekeep_db::repositories::EventRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /events` and `PUT /events/{id}`.
///
/// Times take `YYYY-MM-DDTHH:MM` (or RFC 3339). On update an absent field is
/// kept and an empty `end_time` clears it.
#[derive(Debug, Default, Deserialize)]
pub struct EventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
}

/// Query parameters for `GET /events/calendar`.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

fn event_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Event", id })
}

fn validation(msg: &str) -> AppError {
    AppError::Core(CoreError::Validation(msg.to_string()))
}

fn check_order(start: Timestamp, end: Option<Timestamp>) -> AppResult<()> {
    match end {
        Some(end) if end < start => Err(validation("end_time must not be before start_time")),
        _ => Ok(()),
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// GET /api/v1/events
pub async fn list_events(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let events = EventRepo::list(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: events }))
}

/// POST /api/v1/events
///
/// `title` and `start_time` are required.
pub async fn create_event(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<EventRequest>,
) -> AppResult<impl IntoResponse> {
    let title = input
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| validation("Event title is required"))?;
    let start_time = match input.start_time.as_deref() {
        Some(raw) if !raw.trim().is_empty() => parse_datetime("start_time", raw)?,
        _ => return Err(validation("start_time is required")),
    };
    let end_time = parse_optional_datetime("end_time", input.end_time.as_deref())?;
    check_order(start_time, end_time)?;

    let create = CreateEvent {
        title,
        description: input.description.and_then(non_blank),
        start_time,
        end_time,
        location: input.location.and_then(non_blank),
    };
    let event = EventRepo::create(&state.pool, user.user_id, &create).await?;

    tracing::info!(event_id = event.id, user_id = user.user_id, "Event created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// GET /api/v1/events/{id}
pub async fn get_event(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let event = EventRepo::find_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| event_not_found(id))?;
    Ok(Json(DataResponse { data: event }))
}

/// PUT /api/v1/events/{id}
pub async fn update_event(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<EventRequest>,
) -> AppResult<impl IntoResponse> {
    let existing = EventRepo::find_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| event_not_found(id))?;

    let mut changes = UpdateEvent::from(&existing);
    if let Some(title) = input.title {
        changes.title = non_blank(title)
            .map(|t| t.trim().to_string())
            .ok_or_else(|| validation("Event title must not be blank"))?;
    }
    if let Some(description) = input.description {
        changes.description = non_blank(description);
    }
    if let Some(ref raw) = input.start_time {
        changes.start_time = parse_datetime("start_time", raw)?;
    }
    if input.end_time.is_some() {
        changes.end_time = parse_optional_datetime("end_time", input.end_time.as_deref())?;
    }
    if let Some(location) = input.location {
        changes.location = non_blank(location);
    }
    check_order(changes.start_time, changes.end_time)?;

    let event = EventRepo::update(&state.pool, id, user.user_id, &changes)
        .await?
        .ok_or_else(|| event_not_found(id))?;

    tracing::info!(event_id = id, user_id = user.user_id, "Event updated");

    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/v1/events/{id}
pub async fn delete_event(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !EventRepo::delete(&state.pool, id, user.user_id).await? {
        return Err(event_not_found(id));
    }
    tracing::info!(event_id = id, user_id = user.user_id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/events/calendar?start=&end=
///
/// Calendar feed of the caller's events overlapping the optional range.
pub async fn calendar(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<CalendarParams>,
) -> AppResult<impl IntoResponse> {
    let start = parse_optional_datetime("start", params.start.as_deref())?;
    let end = parse_optional_datetime("end", params.end.as_deref())?;
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(validation("end must not be before start"));
        }
    }

    let entries: Vec<CalendarEntry> =
        EventRepo::list_in_range(&state.pool, user.user_id, start, end)
            .await?
            .into_iter()
            .map(CalendarEntry::from)
            .collect();

    Ok(Json(DataResponse { data: entries }))
}
