use sqlx::PgPool;

/// All `id` columns must be bigint.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_pks_are_bigint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        assert_eq!(data_type, "bigint", "Table {table}.id should be bigint");
    }
}

/// Every table (except _sqlx_migrations) must have created_at and updated_at as timestamptz.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_tables_have_timestamps(pool: PgPool) {
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table,) in &tables {
        for col in ["created_at", "updated_at"] {
            let result: Option<(String,)> = sqlx::query_as(
                "SELECT data_type
                 FROM information_schema.columns
                 WHERE table_schema = 'public'
                   AND table_name = $1
                   AND column_name = $2",
            )
            .bind(table)
            .bind(col)
            .fetch_optional(&pool)
            .await
            .unwrap();

            let (data_type,) =
                result.unwrap_or_else(|| panic!("Table {table} is missing column {col}"));
            assert_eq!(
                data_type, "timestamp with time zone",
                "Table {table}.{col} should be timestamptz, got {data_type}"
            );
        }
    }
}

/// Text columns are unbounded TEXT; length limits live in the domain layer.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_no_varchar_columns(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, column_name
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND data_type = 'character varying'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name, column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(rows.is_empty(), "Found VARCHAR columns: {rows:?}");
}

/// Every foreign key column must have a corresponding index.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_fks_have_indexes(pool: PgPool) {
    let fk_columns: Vec<(String, String)> = sqlx::query_as(
        "SELECT DISTINCT tc.table_name, kcu.column_name
         FROM information_schema.table_constraints tc
         JOIN information_schema.key_column_usage kcu
             ON tc.constraint_name = kcu.constraint_name
             AND tc.table_schema = kcu.table_schema
         WHERE tc.constraint_type = 'FOREIGN KEY'
           AND tc.table_schema = 'public'
         ORDER BY tc.table_name, kcu.column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!fk_columns.is_empty());
    for (table, column) in &fk_columns {
        let (has_index,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM pg_indexes
                WHERE schemaname = 'public'
                  AND tablename = $1
                  AND indexdef LIKE '%(' || $2 || '%'
            )",
        )
        .bind(table)
        .bind(column)
        .fetch_one(&pool)
        .await
        .unwrap();

        assert!(has_index, "FK column {table}.{column} has no index");
    }
}

/// Relationship rules: cascade children and team links, null out optional
/// parents, protect referenced contractor roles.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_fk_delete_rules(pool: PgPool) {
    let rules: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT tc.table_name, kcu.column_name, rc.delete_rule
         FROM information_schema.referential_constraints rc
         JOIN information_schema.table_constraints tc
             ON rc.constraint_name = tc.constraint_name
             AND rc.constraint_schema = tc.table_schema
         JOIN information_schema.key_column_usage kcu
             ON kcu.constraint_name = tc.constraint_name
             AND kcu.table_schema = tc.table_schema
         WHERE rc.constraint_schema = 'public'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    let rule = |table: &str, column: &str| {
        rules
            .iter()
            .find(|(t, c, _)| t == table && c == column)
            .map(|(_, _, r)| r.as_str())
            .unwrap_or_else(|| panic!("no FK on {table}.{column}"))
    };

    assert_eq!(rule("project_awards", "project_id"), "CASCADE");
    assert_eq!(rule("project_images", "project_id"), "CASCADE");
    assert_eq!(rule("project_contractors", "project_id"), "CASCADE");
    assert_eq!(rule("project_contractors", "role_id"), "RESTRICT");
    assert_eq!(rule("projects", "category_id"), "SET NULL");
    assert_eq!(rule("gallery_images", "related_project_id"), "SET NULL");
    assert_eq!(rule("sub_categories", "main_category_id"), "CASCADE");
    assert_eq!(rule("staff", "sub_category_id"), "CASCADE");
    assert_eq!(rule("news_articles", "category_id"), "SET NULL");
    assert_eq!(rule("news_images", "article_id"), "CASCADE");
    assert_eq!(rule("project_leader_links", "project_id"), "CASCADE");
    assert_eq!(rule("project_leader_links", "person_id"), "CASCADE");
    assert_eq!(rule("project_team_member_links", "project_id"), "CASCADE");
    assert_eq!(rule("project_team_member_links", "person_id"), "CASCADE");
}
