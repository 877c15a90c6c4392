//! Credit balance, transaction history, boost, and package handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use reelboard_core::{CreditTransaction, VideoId};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Balance response.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Current credit balance.
    pub balance: i64,
    /// Cumulative lifetime credits earned.
    pub lifetime_earned: i64,
}

/// Get current credit balance.
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.engine.get_balance(&auth.user_id)?;

    Ok(Json(BalanceResponse {
        balance: balance.balance,
        lifetime_earned: balance.lifetime_earned,
    }))
}

/// Transaction list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Maximum number of transactions to return (default: 50).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// Transaction response.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: String,
    /// Signed credit amount (positive = award, negative = spend).
    pub amount: i64,
    /// Transaction type (kebab-case wire name).
    pub transaction_type: reelboard_core::TransactionType,
    /// Human-readable reason.
    pub reason: String,
    /// Related video, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_video_id: Option<String>,
    /// Timestamp (RFC 3339).
    pub created_at: String,
}

impl From<&CreditTransaction> for TransactionResponse {
    fn from(tx: &CreditTransaction) -> Self {
        Self {
            id: tx.id.to_string(),
            amount: tx.amount,
            transaction_type: tx.transaction_type,
            reason: tx.reason.clone(),
            related_video_id: tx.related_video_id.map(|v| v.to_string()),
            created_at: tx.created_at.to_rfc3339(),
        }
    }
}

/// List transactions response.
#[derive(Debug, Serialize)]
pub struct ListTransactionsResponse {
    /// Transactions (newest first).
    pub transactions: Vec<TransactionResponse>,
    /// Whether there are more transactions.
    pub has_more: bool,
}

/// List transaction history.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    // Fetch one more than requested to determine has_more
    let limit = query.limit.min(100);
    let transactions = state
        .engine
        .list_transactions(&auth.user_id, limit + 1, query.offset)?;

    let has_more = transactions.len() > limit;
    let transactions: Vec<_> = transactions
        .iter()
        .take(limit)
        .map(TransactionResponse::from)
        .collect();

    Ok(Json(ListTransactionsResponse {
        transactions,
        has_more,
    }))
}

/// Boost request.
#[derive(Debug, Deserialize)]
pub struct BoostRequest {
    /// The video to boost.
    pub video_id: String,
}

/// Boost response.
#[derive(Debug, Serialize)]
pub struct BoostResponse {
    /// Credits deducted (from the server-side policy).
    pub cost: i64,
    /// Balance after the deduction.
    pub new_balance: i64,
}

/// Spend credits on a visibility boost.
pub async fn boost_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<BoostRequest>,
) -> Result<Json<BoostResponse>, ApiError> {
    let video_id = body
        .video_id
        .parse::<VideoId>()
        .map_err(|_| ApiError::BadRequest("Invalid video ID".into()))?;

    let boost = state.engine.boost_video(&auth.user_id, &video_id)?;

    Ok(Json(BoostResponse {
        cost: boost.cost,
        new_balance: boost.new_balance,
    }))
}

/// Package response.
#[derive(Debug, Serialize)]
pub struct PackageResponse {
    /// Package ID.
    pub id: String,
    /// Base credits.
    pub credits: i64,
    /// Bonus credits.
    pub bonus: i64,
    /// Total credits granted on purchase.
    pub total_credits: i64,
    /// Price in minor currency units.
    pub price_cents: i64,
}

/// List packages response.
#[derive(Debug, Serialize)]
pub struct ListPackagesResponse {
    /// Purchasable packages, cheapest first.
    pub packages: Vec<PackageResponse>,
}

/// List the purchasable credit packages.
pub async fn list_packages(
    State(state): State<Arc<AppState>>,
) -> Json<ListPackagesResponse> {
    let packages = state
        .engine
        .packages()
        .list()
        .iter()
        .map(|p| PackageResponse {
            id: p.id.clone(),
            credits: p.credits,
            bonus: p.bonus,
            total_credits: p.total_credits(),
            price_cents: p.price_cents,
        })
        .collect();

    Json(ListPackagesResponse { packages })
}
