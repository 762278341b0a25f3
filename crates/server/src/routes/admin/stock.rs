//! Admin stock management route handler.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;

use bloomery_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Stock update request body.
#[derive(Debug, Deserialize)]
pub struct StockRequest {
    pub stock: i32,
}

/// Set a product's stock level.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<StockRequest>,
) -> Result<impl IntoResponse> {
    if body.stock < 0 {
        return Err(AppError::BadRequest(
            "A valid stock quantity is required.".to_string(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .update_stock(ProductId::new(id), body.stock)
        .await?;

    tracing::info!(product_id = %product.id, stock = body.stock, by = %admin.id, "stock updated");

    Ok(Json(product))
}
