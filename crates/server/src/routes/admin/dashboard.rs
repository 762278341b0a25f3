//! Admin dashboard route handler.

use axum::{Json, extract::State, response::IntoResponse};
use chrono::{Duration, Utc};
use serde_json::json;

use crate::db::{OrderRepository, ProductRepository, ReportsRepository, UserRepository};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Products with stock below this count as "low stock" on the dashboard.
const LOW_STOCK_THRESHOLD: i32 = 10;

/// How many recent orders/users/low-stock products to show.
const DASHBOARD_LIST_LIMIT: i64 = 5;

/// Shop statistics: totals, recent activity, low stock, and a trailing
/// twelve-month revenue series.
pub async fn show(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());
    let orders = OrderRepository::new(state.pool());
    let products = ProductRepository::new(state.pool());
    let reports = ReportsRepository::new(state.pool());

    let total_users = users.count().await?;
    let total_orders = orders.count().await?;
    let total_products = products.count().await?;
    let total_revenue = reports.total_revenue().await?;

    let recent_orders = orders.list_recent(DASHBOARD_LIST_LIMIT).await?;
    let low_stock_products = products
        .list_low_stock(LOW_STOCK_THRESHOLD, DASHBOARD_LIST_LIMIT)
        .await?;
    let recent_users = users.list_recent(DASHBOARD_LIST_LIMIT).await?;

    let year_ago = Utc::now() - Duration::days(365);
    let monthly_revenue = reports.monthly_revenue(year_ago).await?;

    Ok(Json(json!({
        "total_users": total_users,
        "total_orders": total_orders,
        "total_products": total_products,
        "total_revenue": total_revenue,
        "recent_orders": recent_orders,
        "low_stock_products": low_stock_products,
        "low_stock_threshold": LOW_STOCK_THRESHOLD,
        "recent_users": recent_users,
        "monthly_revenue": monthly_revenue,
    })))
}
