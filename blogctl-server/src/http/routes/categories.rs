//! Category endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Category, CategoryPatch, CategoryRepo, NewCategory};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{CategoryName, Slug};

use super::{SlugResponse, SuccessResponse};

/// Create category request
#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
}

/// Update category request. Absent fields are left untouched.
#[derive(Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
}

#[derive(Deserialize)]
pub struct GenerateCategorySlugRequest {
    pub name: String,
}

/// Category response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            slug: c.slug,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

/// GET /categories - all categories, newest first
async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = CategoryRepo::new(&state.pool).list().await?;
    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

/// GET /categories/slug/{slug} - get a single category by slug
async fn get_category_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let category = CategoryRepo::new(&state.pool).get_by_slug(&slug).await?;
    Ok(Json(CategoryResponse::from(category)))
}

/// POST /categories - create a new category
async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let draft = NewCategory {
        name: CategoryName::new(&req.name)?,
        description: req.description,
        slug: Slug::new(&req.slug)?,
    };

    let category = CategoryRepo::new(&state.pool).create(draft).await?;
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

/// PATCH /categories/{id} - partially update a category
async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let patch = CategoryPatch {
        name: req.name.as_deref().map(CategoryName::new).transpose()?,
        description: req.description,
        slug: req.slug.as_deref().map(Slug::new).transpose()?,
    };

    let category = CategoryRepo::new(&state.pool).update(id, patch).await?;
    Ok(Json(CategoryResponse::from(category)))
}

/// DELETE /categories/{id} - delete a category
///
/// Detaches the category from every post via the join-table cascade;
/// posts themselves survive.
async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    CategoryRepo::new(&state.pool).delete(id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// POST /categories/generate-slug - derive a unique slug from a name
async fn generate_slug(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateCategorySlugRequest>,
) -> Result<Json<SlugResponse>, ApiError> {
    let slug = CategoryRepo::new(&state.pool)
        .generate_slug(&req.name)
        .await?;
    Ok(Json(SlugResponse { slug }))
}

/// Category routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/generate-slug", post(generate_slug))
        .route("/categories/slug/{slug}", get(get_category_by_slug))
        .route(
            "/categories/{id}",
            patch(update_category).delete(delete_category),
        )
}
