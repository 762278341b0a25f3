//! Reporting queries for the admin dashboard and financial report.
//!
//! Aggregates only; everything here is read-only. Cancelled orders are
//! excluded from revenue figures.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use bloomery_core::{CategoryId, ProductId};

use super::RepositoryError;

/// One month's revenue bucket.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRevenue {
    pub month: DateTime<Utc>,
    pub revenue: Decimal,
}

/// One day's revenue bucket.
#[derive(Debug, Clone, Serialize)]
pub struct DailyRevenue {
    pub day: DateTime<Utc>,
    pub revenue: Decimal,
}

/// A product ranked by revenue over the report window.
#[derive(Debug, Clone, Serialize)]
pub struct TopProduct {
    pub id: ProductId,
    pub name: String,
    pub revenue: Decimal,
    pub quantity: i64,
}

/// Revenue attributed to one category over the report window.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRevenue {
    pub id: CategoryId,
    pub category: String,
    pub revenue: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct BucketRow {
    bucket: DateTime<Utc>,
    revenue: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct TopProductRow {
    id: i32,
    name: String,
    revenue: Decimal,
    quantity: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRevenueRow {
    id: i32,
    category: String,
    revenue: Decimal,
}

/// Repository for reporting queries.
pub struct ReportsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportsRepository<'a> {
    /// Create a new reports repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Total revenue over all non-cancelled orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_revenue(&self) -> Result<Decimal, RepositoryError> {
        let total = sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT SUM(total_amount) FROM orders WHERE status <> 'CANCELLED'",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(total.unwrap_or_default())
    }

    /// Revenue and order count since the given cutoff.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<(Decimal, i64), RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct TotalsRow {
            revenue: Option<Decimal>,
            orders: i64,
        }

        let row = sqlx::query_as::<_, TotalsRow>(
            "SELECT SUM(total_amount) AS revenue, COUNT(*) AS orders
             FROM orders
             WHERE created_at >= $1 AND status <> 'CANCELLED'",
        )
        .bind(cutoff)
        .fetch_one(self.pool)
        .await?;

        Ok((row.revenue.unwrap_or_default(), row.orders))
    }

    /// Monthly revenue buckets over the trailing window, oldest first.
    /// Months with no orders are absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn monthly_revenue(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<MonthlyRevenue>, RepositoryError> {
        let rows = sqlx::query_as::<_, BucketRow>(
            "SELECT date_trunc('month', created_at) AS bucket,
                    SUM(total_amount) AS revenue
             FROM orders
             WHERE created_at >= $1 AND status <> 'CANCELLED'
             GROUP BY 1
             ORDER BY 1 ASC",
        )
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| MonthlyRevenue {
                month: r.bucket,
                revenue: r.revenue,
            })
            .collect())
    }

    /// Daily revenue buckets since the cutoff, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn daily_revenue(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyRevenue>, RepositoryError> {
        let rows = sqlx::query_as::<_, BucketRow>(
            "SELECT date_trunc('day', created_at) AS bucket,
                    SUM(total_amount) AS revenue
             FROM orders
             WHERE created_at >= $1 AND status <> 'CANCELLED'
             GROUP BY 1
             ORDER BY 1 ASC",
        )
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DailyRevenue {
                day: r.bucket,
                revenue: r.revenue,
            })
            .collect())
    }

    /// Products ranked by revenue (copied order-item prices, not current
    /// catalog prices) since the cutoff.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_products(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<TopProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, TopProductRow>(
            "SELECT p.id, p.name,
                    SUM(oi.price * oi.quantity) AS revenue,
                    SUM(oi.quantity)::BIGINT AS quantity
             FROM order_items oi
             JOIN orders o ON o.id = oi.order_id
             JOIN products p ON p.id = oi.product_id
             WHERE o.created_at >= $1 AND o.status <> 'CANCELLED'
             GROUP BY p.id, p.name
             ORDER BY revenue DESC
             LIMIT $2",
        )
        .bind(since)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| TopProduct {
                id: ProductId::new(r.id),
                name: r.name,
                revenue: r.revenue,
                quantity: r.quantity,
            })
            .collect())
    }

    /// Revenue grouped by category since the cutoff, highest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue_by_category(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<CategoryRevenue>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRevenueRow>(
            "SELECT c.id, c.name AS category,
                    SUM(oi.price * oi.quantity) AS revenue
             FROM order_items oi
             JOIN orders o ON o.id = oi.order_id
             JOIN products p ON p.id = oi.product_id
             JOIN categories c ON c.id = p.category_id
             WHERE o.created_at >= $1 AND o.status <> 'CANCELLED'
             GROUP BY c.id, c.name
             ORDER BY revenue DESC",
        )
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CategoryRevenue {
                id: CategoryId::new(r.id),
                category: r.category,
                revenue: r.revenue,
            })
            .collect())
    }
}
