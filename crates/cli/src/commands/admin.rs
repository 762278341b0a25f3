//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Promote an existing user to admin
//! bloomery-cli admin promote -e admin@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `BLOOMERY_DATABASE_URL` - `PostgreSQL` connection string

use thiserror::Error;

use super::{CommandError, database_url};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No user with that email.
    #[error("No user found with email: {0}")]
    UserNotFound(String),
}

/// Promote an existing user to the ADMIN role.
///
/// # Errors
///
/// Returns `AdminError::UserNotFound` if no account uses the email.
pub async fn promote(email: &str) -> Result<(), AdminError> {
    // Basic email validation
    if !email.contains('@') || !email.contains('.') {
        return Err(AdminError::InvalidEmail(email.to_owned()));
    }

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = bloomery_server::db::create_pool(&database_url).await?;

    let result = sqlx::query("UPDATE users SET role = 'ADMIN', updated_at = NOW() WHERE email = $1")
        .bind(email)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AdminError::UserNotFound(email.to_owned()));
    }

    tracing::info!("User {} is now an admin.", email);
    Ok(())
}
