//! Post repository
//!
//! Posts carry a many-to-many category set through the
//! `post_categories` join table. Reads attach the category list in
//! application code (one join query for the whole page); writes
//! replace the join rows inside the same transaction as the row
//! mutation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::models::{Content, ListQuery, Slug, Title};

use super::{conflict_on_unique, missing_category_on_fk, DbError};

/// Post record from database
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub slug: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category fields embedded in post responses
#[derive(Debug, Clone, FromRow)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Post with its full category list. `categories` is always present,
/// empty for an uncategorized post.
#[derive(Debug, Clone)]
pub struct PostWithCategories {
    pub post: Post,
    pub categories: Vec<CategoryRef>,
}

/// Filter for post listings
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub published: Option<bool>,
    pub category_id: Option<i64>,
    pub page: ListQuery,
}

/// Validated input for creating a post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: Title,
    pub content: Content,
    pub excerpt: Option<String>,
    pub slug: Slug,
    pub published: bool,
    pub category_ids: Vec<i64>,
}

/// Partial update for a post. `None` fields are left untouched;
/// `category_ids: Some(vec![])` clears all associations.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<Title>,
    pub content: Option<Content>,
    pub excerpt: Option<String>,
    pub slug: Option<Slug>,
    pub published: Option<bool>,
    pub category_ids: Option<Vec<i64>>,
}

const POST_COLUMNS: &str = "id, title, content, excerpt, slug, published, created_at, updated_at";

/// Post repository
pub struct PostRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List posts newest-first with optional published/category filters.
    ///
    /// The category filter resolves the joined post-id set first; a
    /// category with no posts short-circuits to an empty Vec without
    /// touching the posts table.
    pub async fn list(&self, filter: &PostFilter) -> Result<Vec<PostWithCategories>, DbError> {
        let scope: Option<Vec<i64>> = match filter.category_id {
            Some(category_id) => {
                let ids: Vec<i64> = sqlx::query_scalar(
                    "SELECT post_id FROM post_categories WHERE category_id = $1",
                )
                .bind(category_id)
                .fetch_all(self.pool)
                .await?;

                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                Some(ids)
            }
            None => None,
        };

        let posts: Vec<Post> = sqlx::query_as(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE ($1::BOOLEAN IS NULL OR published = $1)
              AND ($2::BIGINT[] IS NULL OR id = ANY($2))
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.published)
        .bind(scope)
        .bind(filter.page.limit())
        .bind(filter.page.offset())
        .fetch_all(self.pool)
        .await?;

        self.attach_categories(posts).await
    }

    /// All published posts, newest first, no paging.
    pub async fn list_published(&self) -> Result<Vec<PostWithCategories>, DbError> {
        let posts: Vec<Post> = sqlx::query_as(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE published = TRUE
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(self.pool)
        .await?;

        self.attach_categories(posts).await
    }

    /// Get a single post by ID.
    pub async fn get(&self, id: i64) -> Result<PostWithCategories, DbError> {
        let post: Post =
            sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?
                .ok_or_else(|| DbError::NotFound {
                    resource: "post",
                    id: id.to_string(),
                })?;

        let categories = self.categories_for(post.id).await?;
        Ok(PostWithCategories { post, categories })
    }

    /// Get a single post by slug.
    pub async fn get_by_slug(&self, slug: &str) -> Result<PostWithCategories, DbError> {
        let post: Post =
            sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = $1"))
                .bind(slug)
                .fetch_optional(self.pool)
                .await?
                .ok_or_else(|| DbError::NotFound {
                    resource: "post",
                    id: slug.to_owned(),
                })?;

        let categories = self.categories_for(post.id).await?;
        Ok(PostWithCategories { post, categories })
    }

    /// Create a post with its category associations (atomic).
    ///
    /// A duplicate slug surfaces as Conflict; an unknown category id
    /// as NotFound. Either way the transaction rolls back whole.
    pub async fn create(&self, draft: NewPost) -> Result<PostWithCategories, DbError> {
        let mut tx = self.pool.begin().await?;

        let post: Post = sqlx::query_as(&format!(
            r#"
            INSERT INTO posts (title, content, excerpt, slug, published)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(draft.title.as_str())
        .bind(draft.content.as_str())
        .bind(draft.excerpt.as_deref())
        .bind(draft.slug.as_str())
        .bind(draft.published)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "post slug", draft.slug.as_str()))?;

        for category_id in &draft.category_ids {
            sqlx::query("INSERT INTO post_categories (post_id, category_id) VALUES ($1, $2)")
                .bind(post.id)
                .bind(category_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| missing_category_on_fk(e, *category_id))?;
        }

        tx.commit().await?;

        let categories = self.categories_for(post.id).await?;
        Ok(PostWithCategories { post, categories })
    }

    /// Partially update a post, refreshing `updated_at`.
    ///
    /// When `category_ids` is supplied (even empty) the association
    /// set is replaced wholesale: delete-then-insert in the same
    /// transaction as the row update. When omitted, associations are
    /// left untouched.
    pub async fn update(&self, id: i64, patch: PostPatch) -> Result<PostWithCategories, DbError> {
        let mut tx = self.pool.begin().await?;

        let slug_hint = patch
            .slug
            .as_ref()
            .map(Slug::as_str)
            .unwrap_or("")
            .to_owned();

        let post: Post = sqlx::query_as(&format!(
            r#"
            UPDATE posts SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                excerpt = COALESCE($4, excerpt),
                slug = COALESCE($5, slug),
                published = COALESCE($6, published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title.as_ref().map(Title::as_str))
        .bind(patch.content.as_ref().map(Content::as_str))
        .bind(patch.excerpt.as_deref())
        .bind(patch.slug.as_ref().map(Slug::as_str))
        .bind(patch.published)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "post slug", &slug_hint))?
        .ok_or_else(|| DbError::NotFound {
            resource: "post",
            id: id.to_string(),
        })?;

        if let Some(category_ids) = &patch.category_ids {
            sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for category_id in category_ids {
                sqlx::query("INSERT INTO post_categories (post_id, category_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(category_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| missing_category_on_fk(e, *category_id))?;
            }
        }

        tx.commit().await?;

        let categories = self.categories_for(post.id).await?;
        Ok(PostWithCategories { post, categories })
    }

    /// Delete a post. Join rows go with it via ON DELETE CASCADE.
    /// Deleting an absent id is a no-op, matching the write surface's
    /// unconditional `{"success": true}` response.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Generate a unique slug for a post title.
    ///
    /// Probes `slug`, `slug-1`, `slug-2`, ... until free. Best-effort:
    /// a concurrent writer can still claim the result first, in which
    /// case the subsequent insert reports Conflict.
    pub async fn generate_slug(&self, title: &str) -> Result<String, DbError> {
        let base = blogctl_core::slugify(title);
        super::first_free_slug(self.pool, "SELECT id FROM posts WHERE slug = $1 LIMIT 1", &base)
            .await
    }

    /// Categories for a single post, ordered by id.
    async fn categories_for(&self, post_id: i64) -> Result<Vec<CategoryRef>, DbError> {
        let categories: Vec<CategoryRef> = sqlx::query_as(
            r#"
            SELECT c.id, c.name, c.slug
            FROM post_categories pc
            JOIN categories c ON c.id = pc.category_id
            WHERE pc.post_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(post_id)
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Attach category lists to a page of posts with a single join
    /// query, grouped in application code.
    async fn attach_categories(
        &self,
        posts: Vec<Post>,
    ) -> Result<Vec<PostWithCategories>, DbError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        let rows: Vec<(i64, i64, String, String)> = sqlx::query_as(
            r#"
            SELECT pc.post_id, c.id, c.name, c.slug
            FROM post_categories pc
            JOIN categories c ON c.id = pc.category_id
            WHERE pc.post_id = ANY($1)
            ORDER BY c.id
            "#,
        )
        .bind(&post_ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_post: HashMap<i64, Vec<CategoryRef>> = HashMap::new();
        for (post_id, id, name, slug) in rows {
            by_post
                .entry(post_id)
                .or_default()
                .push(CategoryRef { id, name, slug });
        }

        Ok(posts
            .into_iter()
            .map(|post| {
                let categories = by_post.remove(&post.id).unwrap_or_default();
                PostWithCategories { post, categories }
            })
            .collect())
    }
}
