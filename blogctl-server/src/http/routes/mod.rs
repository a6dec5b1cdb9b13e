//! Route handlers organized by resource

pub mod categories;
pub mod health;
pub mod posts;

use serde::Serialize;

/// Body for DELETE responses: always `{"success": true}`.
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Body for generate-slug responses.
#[derive(Serialize)]
pub struct SlugResponse {
    pub slug: String,
}
