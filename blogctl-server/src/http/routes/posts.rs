//! Post endpoints
//!
//! Wire format keeps the camelCase field names the original API used
//! (`categoryIds`, `createdAt`, ...), so existing clients keep working.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{NewPost, PostFilter, PostPatch, PostRepo, PostWithCategories};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{Content, ListQuery, Slug, Title};

use super::{SlugResponse, SuccessResponse};

/// Query parameters for GET /posts
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsParams {
    pub published: Option<bool>,
    pub category_id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Create post request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

/// Update post request. Absent fields are left untouched;
/// `categoryIds: []` clears all associations.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub slug: Option<String>,
    pub published: Option<bool>,
    pub category_ids: Option<Vec<i64>>,
}

#[derive(Deserialize)]
pub struct GeneratePostSlugRequest {
    pub title: String,
}

/// Category fields nested in post responses
#[derive(Serialize)]
pub struct CategoryRefResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Post response with nested categories
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub slug: String,
    pub published: bool,
    pub created_at: String,
    pub updated_at: String,
    pub categories: Vec<CategoryRefResponse>,
}

impl From<PostWithCategories> for PostResponse {
    fn from(p: PostWithCategories) -> Self {
        Self {
            id: p.post.id,
            title: p.post.title,
            content: p.post.content,
            excerpt: p.post.excerpt,
            slug: p.post.slug,
            published: p.post.published,
            created_at: p.post.created_at.to_rfc3339(),
            updated_at: p.post.updated_at.to_rfc3339(),
            categories: p
                .categories
                .into_iter()
                .map(|c| CategoryRefResponse {
                    id: c.id,
                    name: c.name,
                    slug: c.slug,
                })
                .collect(),
        }
    }
}

/// GET /posts - list posts with optional filters
async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListPostsParams>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let filter = PostFilter {
        published: params.published,
        category_id: params.category_id,
        page: ListQuery::from_options(params.limit, params.offset),
    };

    let posts = PostRepo::new(&state.pool).list(&filter).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// GET /posts/published - all published posts, newest first
async fn list_published(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = PostRepo::new(&state.pool).list_published().await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// GET /posts/{id} - get a single post
async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = PostRepo::new(&state.pool).get(id).await?;
    Ok(Json(PostResponse::from(post)))
}

/// GET /posts/slug/{slug} - get a single post by slug
async fn get_post_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = PostRepo::new(&state.pool).get_by_slug(&slug).await?;
    Ok(Json(PostResponse::from(post)))
}

/// POST /posts - create a new post
async fn create_post(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let draft = NewPost {
        title: Title::new(&req.title)?,
        content: Content::new(&req.content)?,
        excerpt: req.excerpt,
        slug: Slug::new(&req.slug)?,
        published: req.published,
        category_ids: req.category_ids,
    };

    let post = PostRepo::new(&state.pool).create(draft).await?;
    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

/// PATCH /posts/{id} - partially update a post
async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let patch = PostPatch {
        title: req.title.as_deref().map(Title::new).transpose()?,
        content: req.content.as_deref().map(Content::new).transpose()?,
        excerpt: req.excerpt,
        slug: req.slug.as_deref().map(Slug::new).transpose()?,
        published: req.published,
        category_ids: req.category_ids,
    };

    let post = PostRepo::new(&state.pool).update(id, patch).await?;
    Ok(Json(PostResponse::from(post)))
}

/// DELETE /posts/{id} - delete a post
async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    PostRepo::new(&state.pool).delete(id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// POST /posts/generate-slug - derive a unique slug from a title
async fn generate_slug(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GeneratePostSlugRequest>,
) -> Result<Json<SlugResponse>, ApiError> {
    let slug = PostRepo::new(&state.pool).generate_slug(&req.title).await?;
    Ok(Json(SlugResponse { slug }))
}

/// Post routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/published", get(list_published))
        .route("/posts/generate-slug", post(generate_slug))
        .route("/posts/slug/{slug}", get(get_post_by_slug))
        .route(
            "/posts/{id}",
            get(get_post).patch(update_post).delete(delete_post),
        )
}
