//! Purchase reconciliation input.
//!
//! The payment provider's confirmation is untrusted input: it carries
//! caller-supplied metadata (package id, declared credit amounts) that
//! the engine revalidates against the server-side package table before
//! any balance mutation.

use reelboard_core::UserId;

/// A payment-completed signal from the payment provider.
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    /// The provider-assigned transaction id. Used as the idempotency
    /// event key; webhook redeliveries carry the same id.
    pub provider_transaction_id: String,

    /// The purchasing user (from the checkout metadata).
    pub user_id: UserId,

    /// The declared package id. Must exist in the catalog.
    pub package_id: String,

    /// Declared base credits (audit field; the total is what is
    /// validated).
    pub declared_credits: i64,

    /// Declared bonus credits (audit field).
    pub declared_bonus: i64,

    /// Declared total credits. Must equal the package's
    /// `credits + bonus` exactly.
    pub declared_total_credits: i64,

    /// The amount actually charged, in minor currency units. Must equal
    /// the package price exactly.
    pub amount_charged_cents: i64,
}
