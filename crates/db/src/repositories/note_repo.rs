//! Repository for the `notes` and `note_category_links` tables.

use notekeep_core::category_ids::dedup;
use notekeep_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use notekeep_core::types::DbId;
use sqlx::PgPool;

use crate::models::note::{CreateNote, Note, NoteFilter, UpdateNote};

/// Column list for the `notes` table (aliased `n`), including the ordered
/// category ids aggregated from the link table.
const COLUMNS: &str = "n.id, n.user_id, n.title, n.content, n.full_content, n.summary, \
    n.note_type, n.tags, n.background_color, n.image_filename, n.preview_image, \
    n.is_published, \
    COALESCE((SELECT array_agg(l.category_id ORDER BY l.position) \
              FROM note_category_links l WHERE l.note_id = n.id), \
             ARRAY[]::BIGINT[]) AS category_ids, \
    n.created_at, n.updated_at";

/// Provides CRUD operations for notes and their category memberships.
pub struct NoteRepo;

impl NoteRepo {
    /// Insert a new note owned by `user_id`, together with its categories.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateNote,
    ) -> Result<Note, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO notes \
                (user_id, title, content, full_content, summary, note_type, tags, \
                 background_color, image_filename, preview_image, is_published) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING id",
        )
        .bind(user_id)
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.full_content)
        .bind(&input.summary)
        .bind(&input.note_type)
        .bind(&input.tags)
        .bind(&input.background_color)
        .bind(&input.image_filename)
        .bind(&input.preview_image)
        .bind(input.is_published)
        .fetch_one(&mut *tx)
        .await?;

        if !input.category_ids.is_empty() {
            Self::set_categories_inner(&mut tx, id, &input.category_ids).await?;
        }

        let query = format!("SELECT {COLUMNS} FROM notes n WHERE n.id = $1");
        let note = sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(note)
    }

    /// Find a note by its ID regardless of owner.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes n WHERE n.id = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a note by ID, only if owned by `user_id`.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes n WHERE n.id = $1 AND n.user_id = $2");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a published note by ID, optionally restricted to one note type.
    pub async fn find_published(
        pool: &PgPool,
        id: DbId,
        note_type: Option<&str>,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes n \
             WHERE n.id = $1 AND n.is_published \
               AND ($2::TEXT IS NULL OR n.note_type = $2)"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(note_type)
            .fetch_optional(pool)
            .await
    }

    /// List notes matching `filter`, most recently updated first.
    ///
    /// Category filtering is exact membership: category 1 never matches a
    /// note that only belongs to category 12.
    pub async fn list(pool: &PgPool, filter: &NoteFilter) -> Result<Vec<Note>, sqlx::Error> {
        let limit = clamp_limit(filter.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(filter.offset);
        let search = filter
            .search
            .as_deref()
            .and_then(notekeep_core::search::contains_pattern);
        let tag = filter
            .tag
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let query = format!(
            "SELECT {COLUMNS} FROM notes n \
             WHERE ($1::BIGINT IS NULL OR n.user_id = $1) \
               AND ($2::BIGINT IS NULL OR EXISTS ( \
                    SELECT 1 FROM note_category_links l \
                    WHERE l.note_id = n.id AND l.category_id = $2)) \
               AND ($3::TEXT IS NULL \
                    OR n.title ILIKE $3 OR n.content ILIKE $3 OR n.full_content ILIKE $3) \
               AND ($4::TEXT IS NULL OR EXISTS ( \
                    SELECT 1 FROM unnest(string_to_array(n.tags, ',')) AS t(tag) \
                    WHERE lower(btrim(t.tag)) = lower($4))) \
               AND ($5::TEXT IS NULL OR n.note_type = $5) \
               AND (NOT $6 OR n.is_published) \
             ORDER BY n.updated_at DESC, n.id DESC \
             LIMIT $7 OFFSET $8"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(filter.owner_id)
            .bind(filter.category_id)
            .bind(search)
            .bind(tag)
            .bind(filter.note_type.as_deref())
            .bind(filter.published_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a note owned by `user_id`. Only non-`None` fields are applied.
    ///
    /// If `category_ids` is `Some`, the note's categories are replaced in
    /// the same transaction. Returns `None` if no such owned note exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateNote,
    ) -> Result<Option<Note>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE notes SET \
                title = COALESCE($3, title), \
                content = COALESCE($4, content), \
                full_content = COALESCE($5, full_content), \
                summary = COALESCE($6, summary), \
                note_type = COALESCE($7, note_type), \
                tags = COALESCE($8, tags), \
                background_color = COALESCE($9, background_color), \
                image_filename = COALESCE($10, image_filename), \
                preview_image = COALESCE($11, preview_image), \
                is_published = COALESCE($12, is_published) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING id",
        )
        .bind(id)
        .bind(user_id)
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.full_content)
        .bind(&input.summary)
        .bind(&input.note_type)
        .bind(&input.tags)
        .bind(&input.background_color)
        .bind(&input.image_filename)
        .bind(&input.preview_image)
        .bind(input.is_published)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        if let Some(ref category_ids) = input.category_ids {
            Self::set_categories_inner(&mut tx, id, category_ids).await?;
        }

        let query = format!("SELECT {COLUMNS} FROM notes n WHERE n.id = $1");
        let note = sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(note))
    }

    /// Delete a note owned by `user_id`. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace category memberships within an existing transaction.
    ///
    /// Repeated ids keep their first position.
    async fn set_categories_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        note_id: DbId,
        category_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM note_category_links WHERE note_id = $1")
            .bind(note_id)
            .execute(&mut **tx)
            .await?;

        for (position, category_id) in dedup(category_ids).into_iter().enumerate() {
            sqlx::query(
                "INSERT INTO note_category_links (note_id, category_id, position) \
                 VALUES ($1, $2, $3)",
            )
            .bind(note_id)
            .bind(category_id)
            .bind(position as i32)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
