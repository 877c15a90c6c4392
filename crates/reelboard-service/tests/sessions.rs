//! Viewing session integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

#[tokio::test]
async fn start_and_complete_awards_one_credit() {
    let harness = TestHarness::new();
    let video_id = harness.register_video(40).await;

    let start = harness
        .server
        .post("/v1/sessions")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "video_id": video_id }))
        .await;
    start.assert_status_ok();

    let start_body: serde_json::Value = start.json();
    assert_eq!(start_body["state"], "started");
    assert_eq!(start_body["resumed"], false);
    let session_id = start_body["session_id"].as_str().unwrap().to_string();

    let complete = harness
        .server
        .post(&format!("/v1/sessions/{session_id}/complete"))
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "watched_seconds": 31 }))
        .await;
    complete.assert_status_ok();

    let complete_body: serde_json::Value = complete.json();
    assert_eq!(complete_body["credit_awarded"], true);
    assert_eq!(complete_body["new_balance"], 1);

    let balance = harness
        .server
        .get("/v1/credits/balance")
        .add_header("authorization", harness.user_auth_header())
        .await;
    balance.assert_status_ok();

    let balance_body: serde_json::Value = balance.json();
    assert_eq!(balance_body["balance"], 1);
    assert_eq!(balance_body["lifetime_earned"], 1);
}

#[tokio::test]
async fn duplicate_completion_returns_ok_without_second_credit() {
    let harness = TestHarness::new();
    let video_id = harness.register_video(40).await;

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

    let second = harness
        .server
        .post(&format!("/v1/sessions/{session_id}/complete"))
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "watched_seconds": 40 }))
        .await;
    second.assert_status_ok();

    let body: serde_json::Value = second.json();
    assert_eq!(body["credit_awarded"], false);
    assert_eq!(body["new_balance"], 1);
}

#[tokio::test]
async fn below_threshold_completion_is_rejected() {
    let harness = TestHarness::new();
    let video_id = harness.register_video(40).await;

    let start: serde_json::Value = harness
        .server
        .post("/v1/sessions")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "video_id": video_id }))
        .await
        .json();
    let session_id = start["session_id"].as_str().unwrap().to_string();

    let early = harness
        .server
        .post(&format!("/v1/sessions/{session_id}/complete"))
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "watched_seconds": 10 }))
        .await;
    early.assert_status_bad_request();

    // Session stays open; a later qualifying completion succeeds.
    let done = harness
        .server
        .post(&format!("/v1/sessions/{session_id}/complete"))
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "watched_seconds": 35 }))
        .await;
    done.assert_status_ok();

    let body: serde_json::Value = done.json();
    assert_eq!(body["credit_awarded"], true);
}

#[tokio::test]
async fn second_start_resumes_the_open_session() {
    let harness = TestHarness::new();
    let video_id = harness.register_video(40).await;

    let first: serde_json::Value = harness
        .server
        .post("/v1/sessions")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "video_id": video_id }))
        .await
        .json();

    let second: serde_json::Value = harness
        .server
        .post("/v1/sessions")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "video_id": video_id }))
        .await
        .json();

    assert_eq!(second["resumed"], true);
    assert_eq!(second["session_id"], first["session_id"]);
}

#[tokio::test]
async fn start_requires_authentication() {
    let harness = TestHarness::new();
    let video_id = harness.register_video(40).await;

    let response = harness
        .server
        .post("/v1/sessions")
        .json(&json!({ "video_id": video_id }))
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn start_with_unknown_video_is_not_found() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/sessions")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "video_id": uuid::Uuid::new_v4().to_string() }))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn completing_another_users_session_is_not_found() {
    let harness = TestHarness::new();
    let video_id = harness.register_video(40).await;

    let start: serde_json::Value = harness
        .server
        .post("/v1/sessions")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "video_id": video_id }))
        .await
        .json();
    let session_id = start["session_id"].as_str().unwrap().to_string();

    let response = harness
        .server
        .post(&format!("/v1/sessions/{session_id}/complete"))
        .add_header("authorization", TestHarness::other_user_auth_header())
        .json(&json!({ "watched_seconds": 31 }))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn video_registration_requires_service_key() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/videos")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({
            "video_id": uuid::Uuid::new_v4().to_string(),
            "title": "Sneaky",
            "duration_seconds": 40
        }))
        .await;
    response.assert_status_unauthorized();
}
