//! Repository for the `categories` table and its note memberships.

use notekeep_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{Category, CategoryDeletion};

/// Column list for categories queries.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List all categories, ordered by name ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY name ASC, id ASC");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Find a category by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a new category, returning the created row.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name)
             VALUES ($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Rename a category, returning the updated row.
    pub async fn rename(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET name = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Return the ids from `ids` that do not name an existing category,
    /// in input order.
    pub async fn find_missing(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar(
            "SELECT u.id FROM unnest($1::BIGINT[]) WITH ORDINALITY AS u(id, ord)
             WHERE NOT EXISTS (SELECT 1 FROM categories c WHERE c.id = u.id)
             ORDER BY u.ord",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Categories of a note in assignment order.
    ///
    /// Joins through `note_category_links`, so ids whose category row has
    /// gone away are simply absent.
    pub async fn list_for_note(pool: &PgPool, note_id: DbId) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT c.id, c.name, c.created_at, c.updated_at
             FROM categories c
             JOIN note_category_links l ON l.category_id = c.id
             WHERE l.note_id = $1
             ORDER BY l.position ASC",
        )
        .bind(note_id)
        .fetch_all(pool)
        .await
    }

    /// Delete a category after removing it from every note that carries it.
    ///
    /// Runs as one transaction: the category row is locked, its note links
    /// are deleted, the affected notes get a fresh `updated_at`, and the
    /// category row is deleted. Either all of it commits or none of it does.
    /// The remaining categories of each note keep their relative order.
    ///
    /// Returns `None` (and changes nothing) if the category does not exist.
    pub async fn delete_detaching_notes(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CategoryDeletion>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Holding the row lock blocks concurrent inserts of new links to this
        // category until we are done (the FK check needs a KEY SHARE lock).
        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM categories WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let mut detached_note_ids: Vec<DbId> = sqlx::query_scalar(
            "DELETE FROM note_category_links WHERE category_id = $1 RETURNING note_id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;
        detached_note_ids.sort_unstable();

        if !detached_note_ids.is_empty() {
            sqlx::query("UPDATE notes SET updated_at = NOW() WHERE id = ANY($1)")
                .bind(&detached_note_ids)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            category_id = id,
            detached = detached_note_ids.len(),
            "Category deleted with note links",
        );

        Ok(Some(CategoryDeletion {
            category_id: id,
            detached_note_ids,
        }))
    }
}
