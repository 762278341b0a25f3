//! Cart repository for database operations.
//!
//! The `cart_items` table has a UNIQUE (user_id, product_id) constraint;
//! adding a product already in the cart merges quantities via upsert
//! rather than creating a second line.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use bloomery_core::{CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::CartLine;
use crate::models::product::ProductSummary;

/// Internal row type for cart lines joined with product info.
#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    id: i32,
    quantity: i32,
    created_at: DateTime<Utc>,
    product_id: i32,
    product_name: String,
    product_price: Decimal,
    product_image: Option<String>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            product: ProductSummary {
                id: ProductId::new(row.product_id),
                name: row.product_name,
                price: row.product_price,
                image: row.product_image,
            },
            quantity: row.quantity,
            created_at: row.created_at,
        }
    }
}

const CART_LINE_SELECT: &str = "SELECT ci.id, ci.quantity, ci.created_at,
        p.id AS product_id, p.name AS product_name,
        p.price AS product_price, p.image AS product_image
 FROM cart_items ci
 JOIN products p ON p.id = ci.product_id";

/// A bare cart row, used for ownership and merge checks.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartItemRecord {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's cart lines with product summaries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(&format!(
            "{CART_LINE_SELECT} WHERE ci.user_id = $1 ORDER BY ci.created_at ASC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a bare cart row by ID (for ownership checks).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CartItemId) -> Result<Option<CartItemRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, CartItemRecord>(
            "SELECT id, user_id, product_id, quantity FROM cart_items WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Find the user's existing line for a product, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartItemRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, CartItemRecord>(
            "SELECT id, user_id, product_id, quantity
             FROM cart_items WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Add a quantity of a product to the user's cart, merging into the
    /// existing line when one exists. Returns the resulting line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartLine, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO cart_items (user_id, product_id, quantity)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, product_id)
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
             RETURNING id",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;

        self.get_line(CartItemId::new(id))
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Set the quantity of a cart line. Returns the updated line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist.
    pub async fn update_quantity(
        &self,
        id: CartItemId,
        quantity: i32,
    ) -> Result<CartLine, RepositoryError> {
        let result = sqlx::query("UPDATE cart_items SET quantity = $1 WHERE id = $2")
            .bind(quantity)
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_line(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete a cart line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist.
    pub async fn delete(&self, id: CartItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// A single cart line with product summary.
    async fn get_line(&self, id: CartItemId) -> Result<Option<CartLine>, RepositoryError> {
        let row = sqlx::query_as::<_, CartLineRow>(&format!("{CART_LINE_SELECT} WHERE ci.id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }
}
