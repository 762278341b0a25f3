//! Order route handlers.
//!
//! Checkout, order history, status changes (admin), and deletion of
//! pending orders.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use bloomery_core::{OrderId, OrderStatus};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Status update request body. The status arrives as a string and is
/// parsed explicitly so unknown values produce 400 instead of a
/// deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

impl StatusRequest {
    pub(crate) fn parse(&self) -> Result<OrderStatus> {
        self.status
            .parse::<OrderStatus>()
            .map_err(|_| AppError::BadRequest("Invalid order status.".to_string()))
    }
}

/// Checkout: convert the caller's cart into an order.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let repo = OrderRepository::new(state.pool());
    let order = repo.checkout(user.id).await?;

    tracing::info!(order_id = %order.order.id, user_id = %user.id, "order placed");

    Ok((StatusCode::CREATED, Json(order)))
}

/// The caller's orders, newest first.
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let repo = OrderRepository::new(state.pool());
    let orders = repo.list_for_user(user.id).await?;

    Ok(Json(orders))
}

/// Order detail. Owners see their own orders; admins see any.
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get_with_items(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found.".to_string()))?;

    if !user.role.is_admin() && order.order.user_id != user.id {
        return Err(AppError::Forbidden(
            "You are not authorized to view this order.".to_string(),
        ));
    }

    Ok(Json(order))
}

/// Update an order's status. Admin only, even for the order's owner.
pub async fn update_status(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<StatusRequest>,
) -> Result<impl IntoResponse> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get_with_items(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found.".to_string()))?;

    if !user.role.is_admin() && order.order.user_id != user.id {
        return Err(AppError::Forbidden(
            "You are not authorized to update this order.".to_string(),
        ));
    }

    if !user.role.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can update order status.".to_string(),
        ));
    }

    let status = body.parse()?;
    let updated = repo.update_status(OrderId::new(id), status).await?;

    Ok(Json(updated))
}

/// Delete an order. Owner or admin; only `PENDING` orders qualify.
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get_with_items(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found.".to_string()))?;

    if !user.role.is_admin() && order.order.user_id != user.id {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this order.".to_string(),
        ));
    }

    if !order.order.status.is_deletable() {
        return Err(AppError::Conflict(
            "Only pending orders can be deleted.".to_string(),
        ));
    }

    repo.delete(OrderId::new(id)).await?;

    Ok(Json(json!({ "message": "Order deleted successfully." })))
}
