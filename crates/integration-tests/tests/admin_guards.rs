//! End-to-end tests for access control on the admin surface.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed applied
//! - The server running (cargo run -p bloomery-server)
//!
//! Run with: cargo test -p bloomery-integration-tests -- --ignored

use bloomery_integration_tests::{client, login_as_admin, register_and_login};
use serde_json::{Value, json};

fn base() -> String {
    bloomery_integration_tests::base_url()
}

#[tokio::test]
#[ignore = "Requires running bloomery-server and a seeded database"]
async fn test_anonymous_callers_get_401_on_admin_routes() {
    let client = client();

    for path in [
        "/api/admin/dashboard",
        "/api/admin/users",
        "/api/admin/orders",
        "/api/admin/messages",
        "/api/admin/reports/financial",
    ] {
        let resp = client
            .get(format!("{}{path}", base()))
            .send()
            .await
            .expect("request failed");
        assert_eq!(resp.status().as_u16(), 401, "expected 401 for {path}");
    }
}

#[tokio::test]
#[ignore = "Requires running bloomery-server and a seeded database"]
async fn test_regular_users_get_403_on_admin_routes() {
    let client = client();
    register_and_login(&client).await;

    let resp = client
        .get(format!("{}/api/admin/users", base()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status().as_u16(), 403);

    // A non-admin cannot change anyone's role, their own included
    let resp = client
        .put(format!("{}/api/admin/users/1/role", base()))
        .json(&json!({ "role": "ADMIN" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status().as_u16(), 403);

    let resp = client
        .delete(format!("{}/api/admin/users/1", base()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
#[ignore = "Requires running bloomery-server and a seeded database"]
async fn test_admin_cannot_demote_or_delete_themselves() {
    let admin = client();
    login_as_admin(&admin).await;

    let me: Value = admin
        .get(format!("{}/api/auth/me", base()))
        .send()
        .await
        .expect("me request failed")
        .json()
        .await
        .expect("me should be JSON");
    let admin_id = me["user"]["id"].as_i64().expect("admin id");

    let resp = admin
        .put(format!("{}/api/admin/users/{admin_id}/role", base()))
        .json(&json!({ "role": "USER" }))
        .send()
        .await
        .expect("role update failed");
    assert_eq!(resp.status().as_u16(), 400);

    let resp = admin
        .delete(format!("{}/api/admin/users/{admin_id}", base()))
        .send()
        .await
        .expect("delete failed");
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
#[ignore = "Requires running bloomery-server and a seeded database"]
async fn test_admin_can_change_another_users_role() {
    // Create a throwaway regular user
    let user_client = client();
    let email = register_and_login(&user_client).await;

    let admin = client();
    login_as_admin(&admin).await;

    // Find the new user's id in the admin listing
    let users: Value = admin
        .get(format!("{}/api/admin/users", base()))
        .send()
        .await
        .expect("user list failed")
        .json()
        .await
        .expect("user list should be JSON");
    let target = users
        .as_array()
        .expect("user list array")
        .iter()
        .find(|u| u["email"].as_str() == Some(email.as_str()))
        .expect("new user should be listed");
    let target_id = target["id"].as_i64().expect("target id");

    let resp = admin
        .put(format!("{}/api/admin/users/{target_id}/role", base()))
        .json(&json!({ "role": "ADMIN" }))
        .send()
        .await
        .expect("role update failed");
    assert!(resp.status().is_success());

    let body: Value = resp.json().await.expect("role response JSON");
    assert_eq!(body["role"].as_str(), Some("ADMIN"));

    // Unknown role values are a validation error, not a 500
    let resp = admin
        .put(format!("{}/api/admin/users/{target_id}/role", base()))
        .json(&json!({ "role": "SUPERUSER" }))
        .send()
        .await
        .expect("role update failed");
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
#[ignore = "Requires running bloomery-server and a seeded database"]
async fn test_order_status_updates_are_admin_only() {
    let client = client();
    register_and_login(&client).await;

    let product = bloomery_integration_tests::find_product_with_stock(&client, 1).await;
    client
        .post(format!("{}/api/cart", base()))
        .json(&json!({ "product_id": product["id"], "quantity": 1 }))
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

    // The owner cannot move their own order along the lifecycle
    let resp = client
        .put(format!("{}/api/orders/{order_id}", base()))
        .json(&json!({ "status": "SHIPPED" }))
        .send()
        .await
        .expect("status update failed");
    assert_eq!(resp.status().as_u16(), 403);

    // The admin can
    let admin = bloomery_integration_tests::client();
    login_as_admin(&admin).await;
    let resp = admin
        .put(format!("{}/api/admin/orders/{order_id}", base()))
        .json(&json!({ "status": "PROCESSING" }))
        .send()
        .await
        .expect("status update failed");
    assert!(resp.status().is_success());

    let body: Value = resp.json().await.expect("order JSON");
    assert_eq!(body["status"].as_str(), Some("PROCESSING"));
}

#[tokio::test]
#[ignore = "Requires running bloomery-server and a seeded database"]
async fn test_contact_message_reaches_admin_inbox_and_reply_threads_back() {
    // Logged-in customer sends a contact message
    let customer = client();
    register_and_login(&customer).await;

    let resp = customer
        .post(format!("{}/api/messages", base()))
        .json(&json!({
            "name": "Curious Customer",
            "email": "curious@example.com",
            "subject": "Delivery",
            "message": "Do you deliver on Sundays?",
        }))
        .send()
        .await
        .expect("contact request failed");
    assert_eq!(resp.status().as_u16(), 201);
    let sent: Value = resp.json().await.expect("contact response JSON");
    let message_id = sent["data"]["id"].as_i64().expect("message id");

    // Admin sees it and replies
    let admin = client();
    login_as_admin(&admin).await;

    let inbox: Value = admin
        .get(format!("{}/api/admin/messages", base()))
        .send()
        .await
        .expect("inbox fetch failed")
        .json()
        .await
        .expect("inbox should be JSON");
    assert!(
        inbox
            .as_array()
            .expect("inbox array")
            .iter()
            .any(|m| m["id"].as_i64() == Some(message_id)),
        "contact message should appear in the admin inbox"
    );

    let resp = admin
        .post(format!("{}/api/admin/messages/{message_id}/reply", base()))
        .json(&json!({ "content": "Yes, Sundays until noon." }))
        .send()
        .await
        .expect("reply failed");
    assert_eq!(resp.status().as_u16(), 201);
    let reply: Value = resp.json().await.expect("reply JSON");

    // The reply is tagged and threaded to the original by embedded id
    let content = reply["data"]["content"].as_str().expect("reply content");
    assert!(content.contains("\"type\":\"reply\""));
    assert!(content.contains(&format!("\"original_message_id\":{message_id}")));

    // And the customer sees it in their own message list
    let mine: Value = customer
        .get(format!("{}/api/messages", base()))
        .send()
        .await
        .expect("messages fetch failed")
        .json()
        .await
        .expect("messages should be JSON");
    assert!(
        mine.as_array()
            .expect("messages array")
            .iter()
            .any(|m| m["content"].as_str().is_some_and(|c| c.contains("\"type\":\"reply\""))),
        "reply should reach the original sender"
    );
}
