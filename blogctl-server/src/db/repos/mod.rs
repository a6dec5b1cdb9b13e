//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Nested data assembled in application code (two queries, no N+1)
//! - Unique violations surfaced as Conflict, not generic errors
//! - Transactions for multi-step mutations

pub mod categories;
pub mod posts;

pub use categories::{Category, CategoryPatch, CategoryRepo, NewCategory};
pub use posts::{CategoryRef, NewPost, Post, PostFilter, PostPatch, PostRepo, PostWithCategories};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} '{value}' already exists")]
    Conflict { resource: &'static str, value: String },
}

/// Map a unique-constraint violation to Conflict, pass everything
/// else through. Used on inserts/updates that write a slug column.
fn conflict_on_unique(err: sqlx::Error, resource: &'static str, value: &str) -> DbError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return DbError::Conflict {
                resource,
                value: value.to_owned(),
            };
        }
    }
    DbError::Sqlx(err)
}

/// Map a foreign-key violation on the join table to NotFound for the
/// referenced category, pass everything else through.
fn missing_category_on_fk(err: sqlx::Error, category_id: i64) -> DbError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return DbError::NotFound {
                resource: "category",
                id: category_id.to_string(),
            };
        }
    }
    DbError::Sqlx(err)
}

/// Probe `base`, `base-1`, `base-2`, ... against the given
/// existence query until a free slug is found.
///
/// Best-effort only: the probe is not atomic with the eventual
/// insert, so two concurrent requests can race for the same result.
/// The unique constraint on the slug column settles the race and the
/// loser sees Conflict.
async fn first_free_slug(
    pool: &sqlx::PgPool,
    exists_sql: &str,
    base: &str,
) -> Result<String, DbError> {
    let mut slug = base.to_owned();
    let mut counter = 1u32;

    loop {
        let existing: Option<i64> = sqlx::query_scalar(exists_sql)
            .bind(&slug)
            .fetch_optional(pool)
            .await?;

        if existing.is_none() {
            return Ok(slug);
        }

        slug = blogctl_core::slug::numbered(base, counter);
        counter += 1;
    }
}
