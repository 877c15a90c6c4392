//! Payment provider webhook handler.
//!
//! The provider delivers confirmations at-least-once; redeliveries and
//! out-of-order retries are normal. Everything the payload declares
//! about credit amounts is revalidated by the engine against the
//! server-side package table.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use reelboard_core::UserId;
use reelboard_engine::PaymentConfirmation;

use crate::crypto::{constant_time_eq, hmac_sha256_hex};
use crate::error::ApiError;
use crate::state::AppState;

/// Payment webhook payload.
#[derive(Debug, Deserialize)]
pub struct PaymentWebhook {
    /// Event type (only "payment.completed" is processed).
    pub event_type: String,
    /// Provider-assigned transaction ID.
    pub provider_transaction_id: String,
    /// The purchasing user (from checkout metadata).
    pub user_id: String,
    /// Declared package ID.
    pub package_id: String,
    /// Declared base credits.
    #[serde(default)]
    pub credits: i64,
    /// Declared bonus credits.
    #[serde(default)]
    pub bonus: i64,
    /// Declared total credits.
    pub total_credits: i64,
    /// Amount actually charged, in minor currency units.
    pub amount_cents: i64,
}

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Whether the webhook was received.
    pub received: bool,
    /// Whether this delivery was a replay of an already-settled
    /// confirmation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_processed: Option<bool>,
    /// Credits granted for the confirmation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<i64>,
}

/// Handle payment provider webhooks.
pub async fn payment_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookResponse>, ApiError> {
    // Verify signature if webhook_secret is configured
    if let Some(webhook_secret) = &state.config.payment_webhook_secret {
        let signature = headers
            .get("x-payment-signature")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::BadRequest("Missing payment signature".into()))?;

        let expected = hmac_sha256_hex(webhook_secret, &body);
        if !constant_time_eq(signature, &expected) {
            tracing::warn!("Invalid payment webhook signature");
            return Err(ApiError::BadRequest("Invalid webhook signature".into()));
        }
    } else {
        // No webhook_secret configured - skip verification (development mode)
        tracing::warn!("Payment webhook_secret not configured - skipping signature verification");
    }

    // Parse webhook payload
    let webhook: PaymentWebhook =
        serde_json::from_str(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::info!(
        event_type = %webhook.event_type,
        provider_transaction_id = %webhook.provider_transaction_id,
        "Received payment webhook"
    );

    if webhook.event_type != "payment.completed" {
        tracing::debug!(event_type = %webhook.event_type, "Unhandled payment event");
        return Ok(Json(WebhookResponse {
            received: true,
            already_processed: None,
            credits: None,
        }));
    }

    let user_id = webhook
        .user_id
        .parse::<UserId>()
        .map_err(|_| ApiError::BadRequest("Invalid user ID".into()))?;

    let confirmation = PaymentConfirmation {
        provider_transaction_id: webhook.provider_transaction_id,
        user_id,
        package_id: webhook.package_id,
        declared_credits: webhook.credits,
        declared_bonus: webhook.bonus,
        declared_total_credits: webhook.total_credits,
        amount_charged_cents: webhook.amount_cents,
    };

    let purchase = state.engine.reconcile_purchase(&confirmation)?;

    Ok(Json(WebhookResponse {
        received: true,
        already_processed: Some(purchase.already_processed),
        credits: Some(purchase.credits),
    }))
}
