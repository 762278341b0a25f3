//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database ping)
//!
//! # Auth
//! POST /api/auth/register          - Create an account
//! POST /api/auth/login             - Log in (sets session cookie)
//! POST /api/auth/logout            - Log out
//! GET  /api/auth/me                - Current session user
//!
//! # Catalog (public reads, admin writes)
//! GET    /api/products             - Product listing (?category_id= filter)
//! POST   /api/products             - Create product (admin)
//! GET    /api/products/{id}        - Product detail
//! PUT    /api/products/{id}        - Update product (admin)
//! DELETE /api/products/{id}        - Delete product (admin)
//! GET    /api/categories           - Category listing
//! POST   /api/categories           - Create category (admin)
//! GET    /api/categories/{id}      - Category with its products
//! DELETE /api/categories/{id}      - Delete category (admin)
//!
//! # Cart (requires auth)
//! GET    /api/cart                 - Cart lines
//! POST   /api/cart                 - Add line (merges on duplicate product)
//! PUT    /api/cart/{id}            - Set line quantity
//! DELETE /api/cart/{id}            - Remove line
//!
//! # Orders (requires auth)
//! POST   /api/orders               - Checkout: cart -> order
//! GET    /api/orders               - Own orders
//! GET    /api/orders/{id}          - Order detail (owner or admin)
//! PUT    /api/orders/{id}          - Update status (admin only)
//! DELETE /api/orders/{id}          - Delete PENDING order (owner or admin)
//!
//! # Favorites (requires auth)
//! GET    /api/favorites            - Favorite products
//! POST   /api/favorites            - Add favorite
//! DELETE /api/favorites            - Remove favorite
//!
//! # Profile (requires auth)
//! GET  /api/profile                - Account + contact details
//! PUT  /api/profile                - Update name/phone/address
//!
//! # Messages
//! POST /api/messages               - Contact-form submission (anonymous ok)
//! GET  /api/messages               - Own messages (requires auth)
//!
//! # Admin (requires ADMIN role)
//! GET    /api/admin/dashboard            - Shop statistics
//! GET    /api/admin/users                - User listing
//! GET    /api/admin/users/{id}           - User detail with orders
//! PUT    /api/admin/users/{id}/role      - Change role (not your own)
//! DELETE /api/admin/users/{id}           - Delete user (not yourself, not admins)
//! GET    /api/admin/orders               - All orders
//! PUT    /api/admin/orders/{id}          - Update order status
//! PUT    /api/admin/stock/{id}           - Set product stock
//! GET    /api/admin/messages             - Admin inbox (originals + replies)
//! POST   /api/admin/messages/{id}/reply  - Reply to a contact message
//! DELETE /api/admin/messages/{id}        - Delete a message
//! GET    /api/admin/reports/financial    - Financial report (?range=7d|30d|90d|365d)
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod favorites;
pub mod messages;
pub mod orders;
pub mod products;
pub mod profile;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route(
            "/{id}",
            get(categories::show).delete(categories::delete),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::index).post(cart::add))
        .route("/{id}", put(cart::update).delete(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route(
            "/{id}",
            get(orders::show)
                .put(orders::update_status)
                .delete(orders::delete),
        )
}

/// Create the favorites routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(favorites::index)
            .post(favorites::add)
            .delete(favorites::remove),
    )
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", get(profile::show).put(profile::update))
}

/// Create the message routes router.
pub fn message_routes() -> Router<AppState> {
    Router::new().route("/", get(messages::index).post(messages::create))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/products", product_routes())
        .nest("/api/categories", category_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/favorites", favorite_routes())
        .nest("/api/profile", profile_routes())
        .nest("/api/messages", message_routes())
        .nest("/api/admin", admin::routes())
}
