//! Category repository
//!
//! Mirror of the post repository without join-table synchronization:
//! categories only ever mutate their own row. Cascade on the join
//! table means deleting a category detaches it from every post
//! without touching the posts themselves.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::models::{CategoryName, Slug};

use super::{conflict_on_unique, DbError};

/// Category record from database
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a category
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: CategoryName,
    pub description: Option<String>,
    pub slug: Slug,
}

/// Partial update for a category. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<CategoryName>,
    pub description: Option<String>,
    pub slug: Option<Slug>,
}

const CATEGORY_COLUMNS: &str = "id, name, description, slug, created_at, updated_at";

/// Category repository
pub struct CategoryRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories, newest first.
    pub async fn list(&self) -> Result<Vec<Category>, DbError> {
        let categories: Vec<Category> = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Get a single category by slug.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Category, DbError> {
        sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "category",
            id: slug.to_owned(),
        })
    }

    /// Create a category. A duplicate slug surfaces as Conflict.
    pub async fn create(&self, draft: NewCategory) -> Result<Category, DbError> {
        sqlx::query_as(&format!(
            r#"
            INSERT INTO categories (name, description, slug)
            VALUES ($1, $2, $3)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(draft.name.as_str())
        .bind(draft.description.as_deref())
        .bind(draft.slug.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "category slug", draft.slug.as_str()))
    }

    /// Partially update a category, refreshing `updated_at`.
    pub async fn update(&self, id: i64, patch: CategoryPatch) -> Result<Category, DbError> {
        let slug_hint = patch
            .slug
            .as_ref()
            .map(Slug::as_str)
            .unwrap_or("")
            .to_owned();

        sqlx::query_as(&format!(
            r#"
            UPDATE categories SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                slug = COALESCE($4, slug),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name.as_ref().map(CategoryName::as_str))
        .bind(patch.description.as_deref())
        .bind(patch.slug.as_ref().map(Slug::as_str))
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "category slug", &slug_hint))?
        .ok_or_else(|| DbError::NotFound {
            resource: "category",
            id: id.to_string(),
        })
    }

    /// Delete a category. Join rows vanish via ON DELETE CASCADE;
    /// the posts themselves are untouched. No-op for an absent id.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Generate a unique slug for a category name.
    pub async fn generate_slug(&self, name: &str) -> Result<String, DbError> {
        let base = blogctl_core::slugify(name);
        super::first_free_slug(
            self.pool,
            "SELECT id FROM categories WHERE slug = $1 LIMIT 1",
            &base,
        )
        .await
    }
}
