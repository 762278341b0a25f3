//! Database operations for the Bloomery `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` / `profiles` - Accounts (role `USER`/`ADMIN`) and contact details
//! - `categories` / `products` - The catalog
//! - `cart_items` - Pending cart lines, one per (user, product)
//! - `orders` / `order_items` - Checked-out orders with copied unit prices
//! - `messages` - Flat message table (contact envelopes + replies)
//! - `favorites` - Saved products
//! - Session table(s) owned by tower-sessions
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p bloomery-cli -- migrate
//! ```
//!
//! Each repository holds a `&PgPool`, reads rows into `sqlx::FromRow`
//! structs, and converts them into domain models via `TryFrom`.

pub mod cart;
pub mod categories;
pub mod favorites;
pub mod messages;
pub mod orders;
pub mod products;
pub mod reports;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use cart::CartRepository;
pub use categories::CategoryRepository;
pub use favorites::FavoriteRepository;
pub use messages::MessageRepository;
pub use orders::{CheckoutError, OrderRepository};
pub use products::ProductRepository;
pub use reports::ReportsRepository;
pub use users::UserRepository;

/// Embedded sqlx migrator for `crates/server/migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run schema migrations plus the session store's own table migration.
///
/// Never called on server startup; the CLI drives this explicitly.
///
/// # Errors
///
/// Returns `sqlx::Error` if any migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    MIGRATOR.run(pool).await.map_err(sqlx::Error::from)?;

    let session_store = tower_sessions_sqlx_store::PostgresStore::new(pool.clone());
    session_store.migrate().await?;

    Ok(())
}

/// Map a sqlx error to `Conflict` when it is a unique violation, with the
/// given message; pass everything else through as `Database`.
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(err)
}

/// Map a sqlx error to `Conflict` when it is a foreign key violation, with
/// the given message; pass everything else through as `Database`.
pub(crate) fn map_foreign_key_violation(err: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(err)
}
