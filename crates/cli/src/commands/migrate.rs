//! Database migration command.
//!
//! Runs the schema migrations embedded in the server crate, then the
//! session store's own table migration. The server never migrates on
//! startup; this command is the only migration path.

use thiserror::Error;

use super::{CommandError, database_url};

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Run all migrations against the configured database.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = bloomery_server::db::create_pool(&database_url)
        .await
        .map_err(MigrationError::Database)?;

    tracing::info!("Running migrations...");
    bloomery_server::db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
