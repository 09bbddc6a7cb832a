//! Category model.

use notekeep_core::category_ids::CategoryId;
use notekeep_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CategoryId for Category {
    fn category_id(&self) -> DbId {
        self.id
    }
}

/// DTO for creating or renaming a category.
#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
}

/// Outcome of deleting a category together with its note memberships.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDeletion {
    pub category_id: DbId,
    /// Notes the category was removed from, ascending by id.
    pub detached_note_ids: Vec<DbId>,
}
