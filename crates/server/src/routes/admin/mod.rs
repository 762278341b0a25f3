//! Admin back-office route handlers.
//!
//! Every route here takes the `RequireAdmin` extractor: anonymous callers
//! get 401, signed-in non-admins 403. Decisions that depend on the target
//! user's row (self-checks, admin-target checks) re-read the database.

pub mod dashboard;
pub mod messages;
pub mod orders;
pub mod reports;
pub mod stock;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the admin routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::show))
        .route("/users", get(users::index))
        .route("/users/{id}", get(users::show).delete(users::delete))
        .route("/users/{id}/role", put(users::update_role))
        .route("/orders", get(orders::index))
        .route("/orders/{id}", put(orders::update_status))
        .route("/stock/{id}", put(stock::update))
        .route("/messages", get(messages::index))
        .route("/messages/{id}", delete(messages::delete))
        .route("/messages/{id}/reply", post(messages::reply))
        .route("/reports/financial", get(reports::financial))
}
