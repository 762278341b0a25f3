//! Category route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use bloomery_core::CategoryId;

use crate::db::{CategoryRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Create request body.
#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    pub description: Option<String>,
}

/// Public category listing.
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let repo = CategoryRepository::new(state.pool());
    let categories = repo.list().await?;

    Ok(Json(categories))
}

/// Public category detail with its products.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let id = CategoryId::new(id);
    let repo = CategoryRepository::new(state.pool());
    let category = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found.".to_string()))?;

    let products = ProductRepository::new(state.pool()).list(Some(id)).await?;

    Ok(Json(json!({
        "id": category.id,
        "name": category.name,
        "description": category.description,
        "products": products,
    })))
}

/// Create a category (admin).
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CategoryPayload>,
) -> Result<impl IntoResponse> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required.".to_string()));
    }

    let repo = CategoryRepository::new(state.pool());
    let category = repo
        .create(body.name.trim(), body.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Delete a category (admin). Fails while products still reference it.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let repo = CategoryRepository::new(state.pool());
    repo.delete(CategoryId::new(id)).await?;

    Ok(Json(json!({ "message": "Category deleted successfully." })))
}
