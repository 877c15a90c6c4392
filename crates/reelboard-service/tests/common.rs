//! Common test utilities for reelboard integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;

use reelboard_core::UserId;
use reelboard_service::{create_router, AppState, ServiceConfig};
use reelboard_store::RocksStore;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// A test user ID for authenticated requests.
    pub test_user_id: UserId,
    /// The service API key for service-to-service requests.
    pub service_api_key: String,
}

impl TestHarness {
    /// Create a new test harness with a fresh database and no webhook
    /// signing secret (development mode).
    pub fn new() -> Self {
        Self::with_webhook_secret(None)
    }

    /// Create a harness with a payment webhook signing secret.
    pub fn with_webhook_secret(payment_webhook_secret: Option<&str>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RocksStore::open(temp_dir.path()).expect("Failed to open store");

        let service_api_key = "test-service-key".to_string();

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            service_api_key: Some(service_api_key.clone()),
            payment_webhook_secret: payment_webhook_secret.map(str::to_string),
            ..ServiceConfig::default()
        };

        let state = AppState::new(Arc::new(store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");
        let test_user_id = UserId::generate();

        Self {
            server,
            _temp_dir: temp_dir,
            test_user_id,
            service_api_key,
        }
    }

    /// Get the authorization header for user authentication.
    ///
    /// The gateway forwards the verified subject as the bearer token.
    pub fn user_auth_header(&self) -> String {
        format!("Bearer {}", self.test_user_id)
    }

    /// Get a different user's auth header (for testing isolation).
    pub fn other_user_auth_header() -> String {
        let other_user = UserId::generate();
        format!("Bearer {other_user}")
    }

    /// Register a playable video through the service endpoint, returning
    /// its id.
    pub async fn register_video(&self, duration_seconds: u32) -> String {
        let video_id = uuid::Uuid::new_v4().to_string();

        self.server
            .post("/v1/videos")
            .add_header("x-api-key", &self.service_api_key)
            .add_header("x-service-name", "upload-pipeline")
            .json(&json!({
                "video_id": video_id,
                "title": "Test demo",
                "duration_seconds": duration_seconds
            }))
            .await
            .assert_status_ok();

        video_id
    }

    /// Credit the test user via a starter-package payment webhook
    /// (development mode, no signature).
    pub async fn fund_with_starter_package(&self, provider_transaction_id: &str) {
        let response = self
            .server
            .post("/webhooks/payments")
            .text(
                serde_json::to_string(&json!({
                    "event_type": "payment.completed",
                    "provider_transaction_id": provider_transaction_id,
                    "user_id": self.test_user_id.to_string(),
                    "package_id": "starter",
                    "credits": 100,
                    "bonus": 0,
                    "total_credits": 100,
                    "amount_cents": 500
                }))
                .unwrap(),
            )
            .await;
        response.assert_status_ok();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
