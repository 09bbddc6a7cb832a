//! Calendar event model.

use notekeep_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Event {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub location: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an event.
#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub title: String,
    pub description: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub location: Option<String>,
}

/// Full replacement of an event's editable fields.
#[derive(Debug, Clone)]
pub struct UpdateEvent {
    pub title: String,
    pub description: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub location: Option<String>,
}

impl From<&Event> for UpdateEvent {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            start_time: event.start_time,
            end_time: event.end_time,
            location: event.location.clone(),
        }
    }
}

/// Calendar feed entry (`start`/`end` as ISO 8601 strings via serde).
#[derive(Debug, Clone, Serialize)]
pub struct CalendarEntry {
    pub id: DbId,
    pub title: String,
    pub start: Timestamp,
    pub end: Option<Timestamp>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl From<Event> for CalendarEntry {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            start: event.start_time,
            end: event.end_time,
            description: event.description,
            location: event.location,
        }
    }
}
