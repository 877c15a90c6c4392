//! Credit balance, history, boost, and package integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

#[tokio::test]
async fn balance_for_unknown_account_is_not_found() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/credits/balance")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn transactions_list_newest_first() {
    let harness = TestHarness::new();
    let video_id = harness.register_video(40).await;
    harness.fund_with_starter_package("pi_history").await;

    harness
        .server
        .post("/v1/boosts")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "video_id": video_id }))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/v1/credits/transactions")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(body["has_more"], false);

    // Newest first: the boost spend before the purchase.
    assert_eq!(transactions[0]["transaction_type"], "spend-boost");
    assert_eq!(transactions[0]["amount"], -5);
    assert_eq!(transactions[1]["transaction_type"], "purchase");
    assert_eq!(transactions[1]["amount"], 100);
}

#[tokio::test]
async fn transactions_paginate_with_has_more() {
    let harness = TestHarness::new();
    harness.fund_with_starter_package("pi_page_1").await;
    harness.fund_with_starter_package("pi_page_2").await;
    harness.fund_with_starter_package("pi_page_3").await;

    let response = harness
        .server
        .get("/v1/credits/transactions?limit=2")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(body["has_more"], true);

    let rest = harness
        .server
        .get("/v1/credits/transactions?limit=2&offset=2")
        .add_header("authorization", harness.user_auth_header())
        .await;
    let rest_body: serde_json::Value = rest.json();
    assert_eq!(rest_body["transactions"].as_array().unwrap().len(), 1);
    assert_eq!(rest_body["has_more"], false);
}

#[tokio::test]
async fn boost_deducts_cost() {
    let harness = TestHarness::new();
    let video_id = harness.register_video(40).await;
    harness.fund_with_starter_package("pi_boost").await;

    let response = harness
        .server
        .post("/v1/boosts")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "video_id": video_id }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["cost"], 5);
    assert_eq!(body["new_balance"], 95);
}

#[tokio::test]
async fn overspend_is_payment_required_with_details() {
    let harness = TestHarness::new();
    let video_id = harness.register_video(40).await;

    // Earn one credit; a boost costs five.
    let start: serde_json::Value = harness
        .server
        .post("/v1/sessions")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "video_id": video_id }))
        .await
        .json();
    let session_id = start["session_id"].as_str().unwrap().to_string();
    harness
        .server
        .post(&format!("/v1/sessions/{session_id}/complete"))
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "watched_seconds": 31 }))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .post("/v1/boosts")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "video_id": video_id }))
        .await;
    response.assert_status(axum::http::StatusCode::PAYMENT_REQUIRED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "insufficient_credits");
    assert_eq!(body["error"]["details"]["balance"], 1);
    assert_eq!(body["error"]["details"]["required"], 5);

    // Balance unchanged.
    let balance: serde_json::Value = harness
        .server
        .get("/v1/credits/balance")
        .add_header("authorization", harness.user_auth_header())
        .await
        .json();
    assert_eq!(balance["balance"], 1);
}

#[tokio::test]
async fn packages_are_public_and_price_sorted() {
    let harness = TestHarness::new();

    let response = harness.server.get("/v1/packages").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let packages = body["packages"].as_array().unwrap();
    assert_eq!(packages.len(), 3);
    assert_eq!(packages[0]["id"], "starter");
    assert_eq!(packages[0]["total_credits"], 100);
    assert_eq!(packages[1]["id"], "plus");
    assert_eq!(packages[1]["total_credits"], 275);
    assert_eq!(packages[2]["id"], "pro");
    assert_eq!(packages[2]["price_cents"], 2000);
}

#[tokio::test]
async fn health_is_public() {
    let harness = TestHarness::new();

    let response = harness.server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}
