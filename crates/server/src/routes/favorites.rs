//! Favorites route handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use bloomery_core::ProductId;

use crate::db::{FavoriteRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Add/remove request body.
#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub product_id: i32,
}

/// The caller's favorite products.
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let repo = FavoriteRepository::new(state.pool());
    let products = repo.list_products(user.id).await?;

    Ok(Json(products))
}

/// Mark a product as a favorite. Adding it twice is a no-op.
pub async fn add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<FavoriteRequest>,
) -> Result<impl IntoResponse> {
    let product_id = ProductId::new(body.product_id);

    ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found.".to_string()))?;

    FavoriteRepository::new(state.pool())
        .upsert(user.id, product_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Product added to favorites." })),
    ))
}

/// Remove a favorite.
pub async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<FavoriteRequest>,
) -> Result<impl IntoResponse> {
    let removed = FavoriteRepository::new(state.pool())
        .delete(user.id, ProductId::new(body.product_id))
        .await?;

    Ok(Json(json!({ "success": removed })))
}
