//! Note model (notes, lists, image notes and articles share one table).

use notekeep_core::category_ids::serialize_encoded;
use notekeep_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::category::Category;

/// A row from the `notes` table joined with its ordered category ids.
///
/// `category_ids` serializes in its encoded form (`"2,5,9"` or `null`).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Note {
    pub id: DbId,
    pub user_id: DbId,
    pub title: Option<String>,
    pub content: Option<String>,
    pub full_content: Option<String>,
    pub summary: Option<String>,
    pub note_type: String,
    pub tags: Option<String>,
    pub background_color: String,
    pub image_filename: Option<String>,
    pub preview_image: Option<String>,
    pub is_published: bool,
    #[serde(serialize_with = "serialize_encoded")]
    pub category_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A note together with its resolved categories, in assignment order.
#[derive(Debug, Clone, Serialize)]
pub struct NoteWithCategories {
    #[serde(flatten)]
    pub note: Note,
    pub categories: Vec<Category>,
}

/// DTO for creating a new note.
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub title: Option<String>,
    pub content: Option<String>,
    pub full_content: Option<String>,
    pub summary: Option<String>,
    pub note_type: String,
    pub tags: Option<String>,
    pub background_color: String,
    pub image_filename: Option<String>,
    pub preview_image: Option<String>,
    pub is_published: bool,
    pub category_ids: Vec<DbId>,
}

/// DTO for updating a note. `None` leaves the column unchanged;
/// `category_ids: Some(vec![])` clears the note's categories.
#[derive(Debug, Clone, Default)]
pub struct UpdateNote {
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
    pub category_ids: Option<Vec<DbId>>,
}

/// Filters for note listings. Every `None` filter is ignored.
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    /// Restrict to one owner.
    pub owner_id: Option<DbId>,
    /// Exact category membership.
    pub category_id: Option<DbId>,
    /// Substring search over title, content and full_content.
    pub search: Option<String>,
    /// Whole-tag match against the comma-separated tag list.
    pub tag: Option<String>,
    pub note_type: Option<String>,
    pub published_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
