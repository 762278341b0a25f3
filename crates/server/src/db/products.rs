//! Product repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use bloomery_core::{CategoryId, ProductId};

use super::{RepositoryError, map_foreign_key_violation};
use crate::models::product::{CategorySummary, Product};

/// Internal row type for product queries (joined with category).
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
    image: Option<String>,
    stock: i32,
    category_id: i32,
    category_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            image: row.image,
            stock: row.stock,
            category: CategorySummary {
                id: CategoryId::new(row.category_id),
                name: row.category_name,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_SELECT: &str = "SELECT p.id, p.name, p.description, p.price, p.image, p.stock,
        p.category_id, c.name AS category_name, p.created_at, p.updated_at
 FROM products p
 JOIN categories c ON c.id = p.category_id";

/// Field set for creating or fully updating a product.
#[derive(Debug, Clone)]
pub struct ProductInput<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price: Decimal,
    pub stock: i32,
    pub category_id: CategoryId,
    pub image: Option<&'a str>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = match category_id {
            Some(category) => {
                sqlx::query_as::<_, ProductRow>(&format!(
                    "{PRODUCT_SELECT} WHERE p.category_id = $1 ORDER BY p.created_at DESC"
                ))
                .bind(category.as_i32())
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProductRow>(&format!(
                    "{PRODUCT_SELECT} ORDER BY p.created_at DESC"
                ))
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_SELECT} WHERE p.id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the category doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &ProductInput<'_>) -> Result<Product, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO products (name, description, price, stock, category_id, image)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(input.name)
        .bind(input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id.as_i32())
        .bind(input.image)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, "category does not exist"))?;

        self.get(ProductId::new(id))
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Fully update a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if the category doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput<'_>,
    ) -> Result<Product, RepositoryError> {
        let result = sqlx::query(
            "UPDATE products
             SET name = $1, description = $2, price = $3, stock = $4,
                 category_id = $5, image = $6, updated_at = NOW()
             WHERE id = $7",
        )
        .bind(input.name)
        .bind(input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id.as_i32())
        .bind(input.image)
        .bind(id.as_i32())
        .execute(self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, "category does not exist"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if order history references it.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await
            .map_err(|e| map_foreign_key_violation(e, "product is referenced by existing orders"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Set a product's stock level (admin stock management).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update_stock(&self, id: ProductId, stock: i32) -> Result<Product, RepositoryError> {
        let result = sqlx::query("UPDATE products SET stock = $1, updated_at = NOW() WHERE id = $2")
            .bind(stock)
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Products whose stock is below the given threshold, lowest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_low_stock(
        &self,
        threshold: i32,
        limit: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_SELECT} WHERE p.stock < $1 ORDER BY p.stock ASC LIMIT $2"
        ))
        .bind(threshold)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Total number of products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
