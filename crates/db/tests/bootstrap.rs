use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    notekeep_db::health_check(&pool).await.unwrap();

    let tables = [
        "users",
        "user_sessions",
        "categories",
        "notes",
        "note_category_links",
        "tasks",
        "events",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The updated_at trigger fires on UPDATE.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updated_at_trigger(pool: PgPool) {
    let (id, created): (i64, chrono::DateTime<chrono::Utc>) = sqlx::query_as(
        "INSERT INTO categories (name) VALUES ('Inbox') RETURNING id, updated_at",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    let updated: chrono::DateTime<chrono::Utc> =
        sqlx::query_scalar("UPDATE categories SET name = 'Archive' WHERE id = $1 RETURNING updated_at")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();

    assert!(updated >= created);
}
