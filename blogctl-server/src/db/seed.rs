//! Demo dataset for local development
//!
//! `seed` wipes the tables and inserts three categories and three
//! posts with associations; `clean` just wipes. Join rows go first so
//! the deletes never trip the foreign keys.

use sqlx::PgPool;

/// Delete all rows from every blog table.
pub async fn clean(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM post_categories").execute(pool).await?;
    sqlx::query("DELETE FROM posts").execute(pool).await?;
    sqlx::query("DELETE FROM categories").execute(pool).await?;
    tracing::info!("all blog tables cleared");
    Ok(())
}

/// Reset the database to the demo dataset.
pub async fn seed(pool: &PgPool) -> Result<(), sqlx::Error> {
    clean(pool).await?;

    let category_rows: [(&str, &str, &str); 3] = [
        (
            "Technology",
            "Latest technology trends and news",
            "technology",
        ),
        (
            "Web Development",
            "Frontend and backend web development",
            "web-development",
        ),
        (
            "Programming",
            "Programming languages and techniques",
            "programming",
        ),
    ];

    let mut category_ids = Vec::with_capacity(category_rows.len());
    for (name, description, slug) in category_rows {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO categories (name, description, slug) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(name)
        .bind(description)
        .bind(slug)
        .fetch_one(pool)
        .await?;
        category_ids.push(id);
    }
    tracing::info!(count = category_ids.len(), "seeded categories");

    let post_rows: [(&str, &str, &str, &str, bool); 3] = [
        (
            "Getting Started with Axum",
            "Axum pairs tower middleware with a type-safe extractor model. \
             This guide walks through routing, shared state, and graceful shutdown \
             for a small JSON API.",
            "A practical introduction to building JSON APIs with axum.",
            "getting-started-with-axum",
            true,
        ),
        (
            "Modeling Many-to-Many Relations in SQL",
            "Join tables with composite primary keys and cascade deletes keep \
             association data consistent without application-side bookkeeping. \
             We cover the schema, the queries, and the update strategy.",
            "Composite keys, cascade deletes, and replace-on-update semantics.",
            "modeling-many-to-many-relations-in-sql",
            true,
        ),
        (
            "Draft: Slug Generation Strategies",
            "Lowercase, collapse separators, trim hyphens - then make it unique. \
             This draft compares counter suffixes against random suffixes and \
             where the unique constraint fits in.",
            "Notes on deriving URL-safe identifiers from titles.",
            "draft-slug-generation-strategies",
            false,
        ),
    ];

    let mut post_ids = Vec::with_capacity(post_rows.len());
    for (title, content, excerpt, slug, published) in post_rows {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts (title, content, excerpt, slug, published)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(excerpt)
        .bind(slug)
        .bind(published)
        .fetch_one(pool)
        .await?;
        post_ids.push(id);
    }
    tracing::info!(count = post_ids.len(), "seeded posts");

    // First post: technology + web-development; second: programming;
    // third (draft): web-development.
    let associations = [
        (post_ids[0], category_ids[0]),
        (post_ids[0], category_ids[1]),
        (post_ids[1], category_ids[2]),
        (post_ids[2], category_ids[1]),
    ];

    for (post_id, category_id) in associations {
        sqlx::query("INSERT INTO post_categories (post_id, category_id) VALUES ($1, $2)")
            .bind(post_id)
            .bind(category_id)
            .execute(pool)
            .await?;
    }
    tracing::info!("seed complete");

    Ok(())
}
