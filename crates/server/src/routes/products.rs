//! Product route handlers.
//!
//! Reads are public; writes require the admin role.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use bloomery_core::{CategoryId, ProductId};

use crate::db::{ProductRepository, products::ProductInput};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category_id: Option<i32>,
}

/// Create/update request body.
#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category_id: i32,
    pub image: Option<String>,
}

impl ProductPayload {
    fn validate(&self) -> Result<ProductInput<'_>> {
        if self.name.trim().is_empty() || self.description.trim().is_empty() {
            return Err(AppError::BadRequest("All fields are required.".to_string()));
        }
        if self.price <= Decimal::ZERO {
            return Err(AppError::BadRequest(
                "Price must be greater than zero.".to_string(),
            ));
        }
        if self.stock < 0 {
            return Err(AppError::BadRequest(
                "Stock cannot be negative.".to_string(),
            ));
        }

        Ok(ProductInput {
            name: self.name.trim(),
            description: self.description.trim(),
            price: self.price,
            stock: self.stock,
            category_id: CategoryId::new(self.category_id),
            image: self.image.as_deref(),
        })
    }
}

/// Public product listing, optionally filtered by category.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let repo = ProductRepository::new(state.pool());
    let products = repo.list(query.category_id.map(CategoryId::new)).await?;

    Ok(Json(products))
}

/// Public product detail.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let repo = ProductRepository::new(state.pool());
    let product = repo
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found.".to_string()))?;

    Ok(Json(product))
}

/// Create a product (admin).
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<ProductPayload>,
) -> Result<impl IntoResponse> {
    let input = body.validate()?;
    let repo = ProductRepository::new(state.pool());
    let product = repo.create(&input).await?;

    tracing::info!(product_id = %product.id, "product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// Fully update a product (admin).
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<ProductPayload>,
) -> Result<impl IntoResponse> {
    let input = body.validate()?;
    let repo = ProductRepository::new(state.pool());
    let product = repo.update(ProductId::new(id), &input).await?;

    Ok(Json(product))
}

/// Delete a product (admin).
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let repo = ProductRepository::new(state.pool());
    repo.delete(ProductId::new(id)).await?;

    Ok(Json(json!({ "message": "Product deleted successfully." })))
}
