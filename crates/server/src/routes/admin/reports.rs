//! Admin financial report route handler.

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::db::ReportsRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// How many top products the report includes.
const TOP_PRODUCT_LIMIT: i64 = 5;

/// Query parameters for the financial report.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub range: Option<String>,
}

fn range_days(range: Option<&str>) -> Result<i64> {
    match range.unwrap_or("30d") {
        "7d" => Ok(7),
        "30d" => Ok(30),
        "90d" => Ok(90),
        "365d" => Ok(365),
        other => Err(AppError::BadRequest(format!("Invalid range: {other}"))),
    }
}

/// Revenue totals, daily series, top products, and category breakdown
/// over the requested window. Cancelled orders are excluded throughout.
pub async fn financial(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse> {
    let days = range_days(query.range.as_deref())?;
    let cutoff = Utc::now() - Duration::days(days);

    let reports = ReportsRepository::new(state.pool());

    let (total_revenue, total_orders) = reports.revenue_since(cutoff).await?;
    let daily_revenue = reports.daily_revenue(cutoff).await?;
    let top_products = reports.top_products(cutoff, TOP_PRODUCT_LIMIT).await?;
    let revenue_by_category = reports.revenue_by_category(cutoff).await?;

    let average_order_value = if total_orders > 0 {
        total_revenue / Decimal::from(total_orders)
    } else {
        Decimal::ZERO
    };

    Ok(Json(json!({
        "range_days": days,
        "total_revenue": total_revenue,
        "total_orders": total_orders,
        "average_order_value": average_order_value,
        "daily_revenue": daily_revenue,
        "top_products": top_products,
        "revenue_by_category": revenue_by_category,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_days_defaults_to_thirty() {
        assert_eq!(range_days(None).expect("default range"), 30);
    }

    #[test]
    fn test_range_days_known_values() {
        assert_eq!(range_days(Some("7d")).expect("7d"), 7);
        assert_eq!(range_days(Some("90d")).expect("90d"), 90);
        assert_eq!(range_days(Some("365d")).expect("365d"), 365);
    }

    #[test]
    fn test_range_days_rejects_unknown() {
        assert!(matches!(
            range_days(Some("14d")),
            Err(AppError::BadRequest(_))
        ));
    }
}
