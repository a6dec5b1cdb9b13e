//! Database migrations for the blog tables

use sqlx::PgPool;

/// Run all migrations. Statements are idempotent so this is safe to
/// call on every startup.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running blog migrations...");

    // Categories table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            description TEXT,
            slug VARCHAR(255) NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Posts table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id BIGSERIAL PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            content TEXT NOT NULL,
            excerpt TEXT,
            slug VARCHAR(255) NOT NULL UNIQUE,
            published BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Post-category join table (many-to-many, cascade on both sides)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS post_categories (
            post_id BIGINT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            category_id BIGINT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
            PRIMARY KEY (post_id, category_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("Blog migrations complete");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Listing is always newest-first
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_created ON posts(created_at DESC)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_published ON posts(published)")
        .execute(pool)
        .await?;

    // Category-filtered listing scans the join table by category
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_post_categories_category ON post_categories(category_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_categories_created ON categories(created_at DESC)")
        .execute(pool)
        .await?;

    Ok(())
}
