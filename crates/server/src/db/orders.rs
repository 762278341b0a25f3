//! Order repository: checkout, listing, status transitions.
//!
//! Checkout converts the caller's entire cart into an order inside one
//! transaction: stock is validated and decremented, unit prices are copied
//! into the order items, and the cart is cleared. Either everything
//! commits or nothing does.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use bloomery_core::{Email, OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem, OrderWithItems};
use crate::models::user::UserSummary;

/// Errors specific to converting a cart into an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// A line asked for more than the product has in stock.
    #[error("not enough stock for {product}")]
    InsufficientStock {
        /// Name of the product that ran short.
        product: String,
    },

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// Internal row type for order headers joined with customer info.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    status: OrderStatus,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    customer_name: String,
    customer_email: String,
}

impl TryFrom<OrderRow> for OrderWithItems {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.customer_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            order: Order {
                id: OrderId::new(row.id),
                user_id: UserId::new(row.user_id),
                status: row.status,
                total_amount: row.total_amount,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            customer: UserSummary {
                id: UserId::new(row.user_id),
                name: row.customer_name,
                email,
            },
            items: Vec::new(),
        })
    }
}

/// Internal row type for order items joined with product info.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    product_name: String,
    product_image: Option<String>,
    quantity: i32,
    price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            product_image: row.product_image,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

/// Cart line snapshot taken inside the checkout transaction.
#[derive(Debug, sqlx::FromRow)]
struct CheckoutLineRow {
    product_id: i32,
    quantity: i32,
    name: String,
    price: Decimal,
    stock: i32,
}

const ORDER_SELECT: &str = "SELECT o.id, o.user_id, o.status, o.total_amount,
        o.created_at, o.updated_at,
        u.name AS customer_name, u.email AS customer_email
 FROM orders o
 JOIN users u ON u.id = o.user_id";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert the user's cart into an order.
    ///
    /// Runs as a single transaction: lock and re-read the cart lines with
    /// current product price and stock, validate every quantity, insert the
    /// order with the computed total, copy the unit price into each order
    /// item, decrement stock, and clear the cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if there is nothing to check out,
    /// `CheckoutError::InsufficientStock` naming the first product that ran
    /// short, or `CheckoutError::Repository` for database failures.
    pub async fn checkout(&self, user_id: UserId) -> Result<OrderWithItems, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        let lines = sqlx::query_as::<_, CheckoutLineRow>(
            "SELECT ci.product_id, ci.quantity, p.name, p.price, p.stock
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.user_id = $1
             ORDER BY ci.product_id
             FOR UPDATE OF p",
        )
        .bind(user_id.as_i32())
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        for line in &lines {
            if line.stock < line.quantity {
                return Err(CheckoutError::InsufficientStock {
                    product: line.name.clone(),
                });
            }
        }

        let total: Decimal = lines
            .iter()
            .map(|line| line.price * Decimal::from(line.quantity))
            .sum();

        let order_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO orders (user_id, status, total_amount)
             VALUES ($1, 'PENDING', $2)
             RETURNING id",
        )
        .bind(user_id.as_i32())
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, price)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.price)
            .execute(&mut *tx)
            .await?;

            sqlx::query("UPDATE products SET stock = stock - $1 WHERE id = $2")
                .bind(line.quantity)
                .bind(line.product_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get_with_items(OrderId::new(order_id))
            .await?
            .ok_or(CheckoutError::Repository(RepositoryError::NotFound))
    }

    /// Get an order with its items and customer summary.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_items(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{ORDER_SELECT} WHERE o.id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut order: OrderWithItems = row.try_into()?;
        let mut items = self.items_for_orders(&[order.order.id.as_i32()]).await?;
        order.items = items.remove(&order.order.id.as_i32()).unwrap_or_default();

        Ok(Some(order))
    }

    /// A user's orders, newest first, with items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{ORDER_SELECT} WHERE o.user_id = $1 ORDER BY o.created_at DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// All orders, newest first, with items (admin listing).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let rows =
            sqlx::query_as::<_, OrderRow>(&format!("{ORDER_SELECT} ORDER BY o.created_at DESC"))
                .fetch_all(self.pool)
                .await?;

        self.attach_items(rows).await
    }

    /// The most recent orders (admin dashboard), without items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{ORDER_SELECT} ORDER BY o.created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Update an order's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderWithItems, RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status)
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_with_items(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete an order (and its items, by cascade).
    ///
    /// The caller is responsible for the status check; this is a plain
    /// delete.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Total number of orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Fetch items for a set of orders and group them by order id.
    async fn items_for_orders(
        &self,
        order_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<OrderItem>>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price,
                    p.name AS product_name, p.image AS product_image
             FROM order_items oi
             JOIN products p ON p.id = oi.product_id
             WHERE oi.order_id = ANY($1)
             ORDER BY oi.id ASC",
        )
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<i32, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            grouped.entry(row.order_id).or_default().push(row.into());
        }

        Ok(grouped)
    }

    /// Convert header rows and attach their items in one batch query.
    async fn attach_items(
        &self,
        rows: Vec<OrderRow>,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let mut orders = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<OrderWithItems>, _>>()?;

        let ids: Vec<i32> = orders.iter().map(|o| o.order.id.as_i32()).collect();
        if ids.is_empty() {
            return Ok(orders);
        }

        let mut items = self.items_for_orders(&ids).await?;
        for order in &mut orders {
            order.items = items.remove(&order.order.id.as_i32()).unwrap_or_default();
        }

        Ok(orders)
    }
}
