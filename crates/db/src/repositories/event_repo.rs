//! Repository for the `events` table.

use notekeep_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::event::{CreateEvent, Event, UpdateEvent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, title, description, start_time, end_time, location, created_at, updated_at";

/// Provides CRUD operations for calendar events. Every query is scoped to one owner.
pub struct EventRepo;

impl EventRepo {
    /// List a user's events by start time ascending.
    pub async fn list(pool: &PgPool, user_id: DbId) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events WHERE user_id = $1 ORDER BY start_time ASC, id ASC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List a user's events overlapping `[start, end]`. Either bound may be open.
    ///
    /// An event without `end_time` is treated as the instant `start_time`.
    pub async fn list_in_range(
        pool: &PgPool,
        user_id: DbId,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE user_id = $1
               AND ($2::TIMESTAMPTZ IS NULL OR COALESCE(end_time, start_time) >= $2)
               AND ($3::TIMESTAMPTZ IS NULL OR start_time <= $3)
             ORDER BY start_time ASC, id ASC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Find an event by ID, only if owned by `user_id`.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new event, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateEvent,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (user_id, title, description, start_time, end_time, location)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.location)
            .fetch_one(pool)
            .await
    }

    /// Replace an event's editable fields. Returns `None` if no owned event matches.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                title = $3,
                description = $4,
                start_time = $5,
                end_time = $6,
                location = $7
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.location)
            .fetch_optional(pool)
            .await
    }

    /// Delete an owned event. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
