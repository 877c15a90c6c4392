//! Credit transaction types for Reelboard.
//!
//! Every balance change creates an immutable transaction record. The set
//! of transactions for a user, summed, always equals that user's current
//! balance; the log is the source of truth and the balance is a
//! projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{SessionId, TransactionId, UserId, VideoId};

/// An immutable ledger entry representing one balance change.
///
/// Transactions use ULIDs for time-ordered IDs. Credit-granting
/// transactions carry the originating event key (viewing-session id or
/// payment-provider transaction id) in the structured `event_key` field;
/// the idempotency guard is a uniqueness check on that field, not a
/// substring search on the description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditTransaction {
    /// Unique transaction ID (ULID for time-ordering).
    pub id: TransactionId,

    /// The user whose balance was affected.
    pub user_id: UserId,

    /// Signed credit amount. Positive = award, negative = spend.
    pub amount: i64,

    /// Type of transaction.
    pub transaction_type: TransactionType,

    /// Human-readable reason. Embeds the event key for auditing.
    pub reason: String,

    /// The external event key this transaction settles, if any.
    /// Viewing-session id for view awards, provider transaction id for
    /// purchases. Spends carry no event key.
    pub event_key: Option<String>,

    /// The video this transaction relates to, if any.
    pub related_video_id: Option<VideoId>,

    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
}

impl CreditTransaction {
    /// Create a view-award transaction for a completed viewing session.
    #[must_use]
    pub fn view_award(
        user_id: UserId,
        amount: i64,
        session_id: SessionId,
        video_id: VideoId,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            amount,
            transaction_type: TransactionType::EarnedByView,
            reason: format!("Earned {amount} credit(s) for watching video (session {session_id})"),
            event_key: Some(session_id.to_string()),
            related_video_id: Some(video_id),
            created_at: Utc::now(),
        }
    }

    /// Create a purchase transaction for a validated payment.
    #[must_use]
    pub fn purchase(
        user_id: UserId,
        amount: i64,
        package_id: &str,
        provider_transaction_id: &str,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            amount,
            transaction_type: TransactionType::Purchase,
            reason: format!(
                "Purchased {amount} credits (package {package_id}, payment {provider_transaction_id})"
            ),
            event_key: Some(provider_transaction_id.to_string()),
            related_video_id: None,
            created_at: Utc::now(),
        }
    }

    /// Create a boost-spend transaction. Amount is always recorded
    /// negative.
    #[must_use]
    pub fn boost_spend(user_id: UserId, amount: i64, video_id: VideoId) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            amount: -amount.abs(),
            transaction_type: TransactionType::SpendBoost,
            reason: format!("Spent {} credits boosting video {video_id}", amount.abs()),
            event_key: None,
            related_video_id: Some(video_id),
            created_at: Utc::now(),
        }
    }
}

/// Type of credit transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionType {
    /// Credit earned by watching a video past the threshold.
    EarnedByView,

    /// Credits purchased through the payment provider.
    Purchase,

    /// Credits spent boosting a video's visibility.
    SpendBoost,
}

impl TransactionType {
    /// Check if this type earns credits (counts toward lifetime earned).
    #[must_use]
    pub const fn is_earning(&self) -> bool {
        matches!(self, Self::EarnedByView | Self::Purchase)
    }

    /// Check if this type removes credits.
    #[must_use]
    pub const fn is_spend(&self) -> bool {
        matches!(self, Self::SpendBoost)
    }
}
