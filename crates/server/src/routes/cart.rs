//! Cart route handlers.
//!
//! All cart routes require a logged-in user. Adding a product that is
//! already in the cart merges quantities into the existing line; the
//! stock check always covers the merged total.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use bloomery_core::{CartItemId, ProductId};

use crate::db::{CartRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub product_id: i32,
    pub quantity: i32,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub quantity: i32,
}

/// The caller's cart lines.
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let repo = CartRepository::new(state.pool());
    let lines = repo.list_for_user(user.id).await?;

    Ok(Json(lines))
}

/// Add a product to the cart, merging into an existing line if present.
pub async fn add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<AddRequest>,
) -> Result<impl IntoResponse> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1.".to_string(),
        ));
    }

    let product_id = ProductId::new(body.product_id);
    let products = ProductRepository::new(state.pool());
    let product = products
        .get(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found.".to_string()))?;

    let cart = CartRepository::new(state.pool());
    let existing_quantity = cart
        .find_line(user.id, product_id)
        .await?
        .map_or(0, |line| line.quantity);

    // The stock check covers the merged total, not just the new quantity
    if product.stock < existing_quantity + body.quantity {
        return Err(AppError::Conflict(
            "Not enough stock available.".to_string(),
        ));
    }

    let line = cart.add(user.id, product_id, body.quantity).await?;

    Ok((StatusCode::CREATED, Json(line)))
}

/// Set the quantity of one of the caller's cart lines.
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateRequest>,
) -> Result<impl IntoResponse> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1.".to_string(),
        ));
    }

    let id = CartItemId::new(id);
    let cart = CartRepository::new(state.pool());
    let record = cart
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item not found.".to_string()))?;

    if record.user_id != user.id.as_i32() {
        return Err(AppError::Forbidden(
            "You are not authorized to update this cart item.".to_string(),
        ));
    }

    let products = ProductRepository::new(state.pool());
    let product = products
        .get(ProductId::new(record.product_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found.".to_string()))?;

    if product.stock < body.quantity {
        return Err(AppError::Conflict(
            "Not enough stock available.".to_string(),
        ));
    }

    let line = cart.update_quantity(id, body.quantity).await?;

    Ok(Json(line))
}

/// Remove one of the caller's cart lines.
pub async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let id = CartItemId::new(id);
    let cart = CartRepository::new(state.pool());
    let record = cart
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item not found.".to_string()))?;

    if record.user_id != user.id.as_i32() {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this cart item.".to_string(),
        ));
    }

    cart.delete(id).await?;

    Ok(Json(json!({ "message": "Cart item deleted successfully." })))
}
