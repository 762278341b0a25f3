//! End-to-end tests for the shop flow: cart, checkout, and order rules.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed applied
//! - The server running (cargo run -p bloomery-server)
//!
//! Run with: cargo test -p bloomery-integration-tests -- --ignored

use bloomery_integration_tests::{
    client, find_product_with_stock, login_as_admin, register_and_login,
};
use serde_json::{Value, json};

fn base() -> String {
    bloomery_integration_tests::base_url()
}

#[tokio::test]
#[ignore = "Requires running bloomery-server and a seeded database"]
async fn test_adding_same_product_twice_merges_cart_lines() {
    let client = client();
    register_and_login(&client).await;

    let product = find_product_with_stock(&client, 3).await;
    let product_id = product["id"].as_i64().expect("product id");

    for _ in 0..2 {
        let resp = client
            .post(format!("{}/api/cart", base()))
            .json(&json!({ "product_id": product_id, "quantity": 1 }))
            .send()
            .await
            .expect("add to cart failed");
        assert_eq!(resp.status().as_u16(), 201);
    }

    let cart: Value = client
        .get(format!("{}/api/cart", base()))
        .send()
        .await
        .expect("cart fetch failed")
        .json()
        .await
        .expect("cart should be JSON");

    let lines = cart.as_array().expect("cart should be an array");
    let matching: Vec<_> = lines
        .iter()
        .filter(|l| l["product"]["id"].as_i64() == Some(product_id))
        .collect();

    // One line, quantity merged to 2 - never a duplicate line
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0]["quantity"].as_i64(), Some(2));
}

#[tokio::test]
#[ignore = "Requires running bloomery-server and a seeded database"]
async fn test_add_to_cart_beyond_stock_is_rejected() {
    let client = client();
    register_and_login(&client).await;

    let product = find_product_with_stock(&client, 1).await;
    let product_id = product["id"].as_i64().expect("product id");
    let stock = product["stock"].as_i64().expect("product stock");

    let resp = client
        .post(format!("{}/api/cart", base()))
        .json(&json!({ "product_id": product_id, "quantity": stock + 1 }))
        .send()
        .await
        .expect("add to cart failed");

    assert_eq!(resp.status().as_u16(), 409);
}

#[tokio::test]
#[ignore = "Requires running bloomery-server and a seeded database"]
async fn test_checkout_creates_pending_order_and_clears_cart() {
    let client = client();
    register_and_login(&client).await;

    let product = find_product_with_stock(&client, 2).await;
    let product_id = product["id"].as_i64().expect("product id");

    let resp = client
        .post(format!("{}/api/cart", base()))
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .expect("add to cart failed");
    assert_eq!(resp.status().as_u16(), 201);

    let resp = client
        .post(format!("{}/api/orders", base()))
        .send()
        .await
        .expect("checkout failed");
    assert_eq!(resp.status().as_u16(), 201);
    let order: Value = resp.json().await.expect("order should be JSON");

    assert_eq!(order["status"].as_str(), Some("PENDING"));
    let items = order["items"].as_array().expect("order items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"].as_i64(), Some(2));

    // Checkout consumed the cart
    let cart: Value = client
        .get(format!("{}/api/cart", base()))
        .send()
        .await
        .expect("cart fetch failed")
        .json()
        .await
        .expect("cart should be JSON");
    assert!(cart.as_array().expect("cart array").is_empty());

    // Stock was decremented by the ordered quantity
    let after: Value = client
        .get(format!("{}/api/products/{product_id}", base()))
        .send()
        .await
        .expect("product fetch failed")
        .json()
        .await
        .expect("product should be JSON");
    let stock_before = product["stock"].as_i64().expect("stock before");
    assert_eq!(after["stock"].as_i64(), Some(stock_before - 2));
}

#[tokio::test]
#[ignore = "Requires running bloomery-server and a seeded database"]
async fn test_checkout_with_empty_cart_is_rejected() {
    let client = client();
    register_and_login(&client).await;

    let resp = client
        .post(format!("{}/api/orders", base()))
        .send()
        .await
        .expect("checkout failed");

    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
#[ignore = "Requires running bloomery-server and a seeded database"]
async fn test_order_item_price_survives_catalog_price_change() {
    let client = client();
    register_and_login(&client).await;

    let product = find_product_with_stock(&client, 1).await;
    let product_id = product["id"].as_i64().expect("product id");
    let original_price = product["price"].as_str().expect("price").to_string();

    client
        .post(format!("{}/api/cart", base()))
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("add to cart failed");

    let order: Value = client
        .post(format!("{}/api/orders", base()))
        .send()
        .await
        .expect("checkout failed")
        .json()
        .await
        .expect("order should be JSON");
    let order_id = order["id"].as_i64().expect("order id");

    // Admin doubles the product price after the order was placed
    let admin = bloomery_integration_tests::client();
    login_as_admin(&admin).await;
    let doubled: rust_decimal::Decimal =
        original_price.parse::<rust_decimal::Decimal>().expect("decimal price")
            * rust_decimal::Decimal::from(2);
    let resp = admin
        .put(format!("{}/api/products/{product_id}", base()))
        .json(&json!({
            "name": product["name"],
            "description": product["description"],
            "price": doubled.to_string(),
            "stock": product["stock"].as_i64().expect("stock") - 1,
            "category_id": product["category"]["id"],
            "image": product["image"],
        }))
        .send()
        .await
        .expect("price update failed");
    assert!(resp.status().is_success());

    // The order item still carries the price copied at checkout time
    let order_after: Value = client
        .get(format!("{}/api/orders/{order_id}", base()))
        .send()
        .await
        .expect("order fetch failed")
        .json()
        .await
        .expect("order should be JSON");

    assert_eq!(
        order_after["items"][0]["price"].as_str(),
        Some(original_price.as_str())
    );
}

#[tokio::test]
#[ignore = "Requires running bloomery-server and a seeded database"]
async fn test_only_pending_orders_can_be_deleted() {
    let client = client();
    register_and_login(&client).await;

    let product = find_product_with_stock(&client, 2).await;
    let product_id = product["id"].as_i64().expect("product id");

    // Place two orders, one line each
    let mut order_ids = Vec::new();
    for _ in 0..2 {
        client
            .post(format!("{}/api/cart", base()))
            .json(&json!({ "product_id": product_id, "quantity": 1 }))
            .send()
            .await
            .expect("add to cart failed");
        let order: Value = client
            .post(format!("{}/api/orders", base()))
            .send()
            .await
            .expect("checkout failed")
            .json()
            .await
            .expect("order should be JSON");
        order_ids.push(order["id"].as_i64().expect("order id"));
    }

    // Admin moves the second order out of PENDING
    let admin = bloomery_integration_tests::client();
    login_as_admin(&admin).await;
    let resp = admin
        .put(format!("{}/api/admin/orders/{}", base(), order_ids[1]))
        .json(&json!({ "status": "PROCESSING" }))
        .send()
        .await
        .expect("status update failed");
    assert!(resp.status().is_success());

    // Owner can delete the PENDING order
    let resp = client
        .delete(format!("{}/api/orders/{}", base(), order_ids[0]))
        .send()
        .await
        .expect("delete failed");
    assert!(resp.status().is_success());

    // But not the PROCESSING one
    let resp = client
        .delete(format!("{}/api/orders/{}", base(), order_ids[1]))
        .send()
        .await
        .expect("delete failed");
    assert_eq!(resp.status().as_u16(), 409);
}
