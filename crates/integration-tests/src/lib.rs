//! Shared helpers for the end-to-end API tests.
//!
//! The tests in `tests/` talk to a running server over HTTP and are
//! `#[ignore]`d by default. To run them:
//!
//! 1. Start `PostgreSQL` and run `bloomery-cli migrate` + `bloomery-cli seed`
//! 2. Start the server: `cargo run -p bloomery-server`
//! 3. `cargo test -p bloomery-integration-tests -- --ignored`

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("BLOOMERY_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Seeded admin credentials (configurable via environment).
#[must_use]
pub fn admin_credentials() -> (String, String) {
    let email =
        std::env::var("BLOOMERY_ADMIN_EMAIL").unwrap_or_else(|_| "admin@bloomery.test".to_string());
    let password =
        std::env::var("BLOOMERY_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123456".to_string());
    (email, password)
}

/// A fresh cookie-holding client.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Register a brand-new user (unique email) and log the client in.
/// Returns the user's email.
///
/// # Panics
///
/// Panics if registration or login fails.
pub async fn register_and_login(client: &Client) -> String {
    let base = base_url();
    let email = format!("test-{}@bloomery.test", Uuid::new_v4());

    let resp = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({
            "name": "Test Customer",
            "email": email,
            "password": "testpassword1",
        }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status().as_u16(), 201, "registration should succeed");

    login(client, &email, "testpassword1").await;

    email
}

/// Log the client in with the given credentials.
///
/// # Panics
///
/// Panics if the login fails.
pub async fn login(client: &Client, email: &str, password: &str) {
    let base = base_url();
    let resp = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("login request failed");
    assert!(resp.status().is_success(), "login should succeed");
}

/// Log the client in as the seeded admin.
///
/// # Panics
///
/// Panics if the login fails.
pub async fn login_as_admin(client: &Client) {
    let (email, password) = admin_credentials();
    login(client, &email, &password).await;
}

/// Fetch the product list and return the first product with at least
/// `min_stock` units available.
///
/// # Panics
///
/// Panics if the request fails or no product qualifies.
pub async fn find_product_with_stock(client: &Client, min_stock: i64) -> Value {
    let base = base_url();
    let products: Value = client
        .get(format!("{base}/api/products"))
        .send()
        .await
        .expect("product list request failed")
        .json()
        .await
        .expect("product list should be JSON");

    products
        .as_array()
        .expect("product list should be an array")
        .iter()
        .find(|p| p["stock"].as_i64().unwrap_or(0) >= min_stock)
        .cloned()
        .expect("seeded database should have a product with enough stock")
}
