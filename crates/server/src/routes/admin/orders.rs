//! Admin order management route handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use bloomery_core::OrderId;

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::routes::orders::StatusRequest;
use crate::state::AppState;

/// All orders with customer summaries and items, newest first.
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;

    Ok(Json(orders))
}

/// Update an order's status.
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<StatusRequest>,
) -> Result<impl IntoResponse> {
    let status = body.parse()?;
    let order = OrderRepository::new(state.pool())
        .update_status(OrderId::new(id), status)
        .await?;

    tracing::info!(order_id = %order.order.id, status = %status, by = %admin.id, "order status updated");

    Ok(Json(order))
}
