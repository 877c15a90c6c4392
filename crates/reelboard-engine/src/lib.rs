//! The Reelboard credit award engine.
//!
//! Turns real-world events (a user watching a video past the threshold,
//! a payment provider confirming a charge) into exactly-once, auditable
//! changes to a user's credit balance. This is the one place in the
//! system where correctness under concurrency and failure genuinely
//! matters; everything else is a client of this crate.
//!
//! # Exactly-once awards
//!
//! Every credit-granting event carries an event key (the viewing-session
//! id, or the payment provider's transaction id). The store's `award`
//! settles each key at most once, atomically with the balance update, so
//! duplicate completions, webhook redeliveries, and racing requests all
//! converge on a single ledger entry. The ledger's `applied` flag is
//! authoritative: the session state transition follows it, never the
//! other way around.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod purchase;

pub use error::{EngineError, Result};
pub use purchase::PaymentConfirmation;

use std::sync::Arc;

use reelboard_core::{
    AwardPolicy, CreditTransaction, PackageCatalog, SessionId, UserId, VideoId, VideoMeta,
    ViewingSession,
};
use reelboard_store::Store;

/// Result of starting (or resuming) a viewing session.
#[derive(Debug, Clone)]
pub struct SessionStart {
    /// The open session for (user, video).
    pub session: ViewingSession,
    /// `true` if an already-open session was reused instead of creating
    /// a new one (e.g. a second browser tab).
    pub resumed: bool,
}

/// Result of a session completion call.
#[derive(Debug, Clone, Copy)]
pub struct Completion {
    /// `true` only for the call that actually granted the view credit.
    /// Duplicate completions and race losers get `false` without error.
    pub credit_awarded: bool,
    /// The user's balance after the call.
    pub new_balance: i64,
}

/// Result of a purchase reconciliation.
#[derive(Debug, Clone, Copy)]
pub struct Purchase {
    /// Credits granted for this provider transaction (from the
    /// authoritative package table, never from client input).
    pub credits: i64,
    /// The user's balance after the call.
    pub new_balance: i64,
    /// `true` if this confirmation had already been processed and the
    /// call was an idempotent no-op.
    pub already_processed: bool,
}

/// Result of a boost spend.
#[derive(Debug, Clone, Copy)]
pub struct Boost {
    /// Credits deducted.
    pub cost: i64,
    /// The user's balance after the deduction.
    pub new_balance: i64,
}

/// A user's balance summary.
#[derive(Debug, Clone, Copy)]
pub struct Balance {
    /// Current credit balance.
    pub balance: i64,
    /// Cumulative lifetime credits earned.
    pub lifetime_earned: i64,
}

/// The credit award engine.
///
/// Owns the award policy and the authoritative package catalog, and
/// drives the ledger store. All methods are safe to call concurrently;
/// the store serializes credit-affecting mutations.
pub struct CreditEngine {
    store: Arc<dyn Store>,
    policy: AwardPolicy,
    packages: PackageCatalog,
}

impl CreditEngine {
    /// Create an engine over a store with the given policy and catalog.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, policy: AwardPolicy, packages: PackageCatalog) -> Self {
        Self {
            store,
            policy,
            packages,
        }
    }

    /// The active award policy.
    #[must_use]
    pub fn policy(&self) -> &AwardPolicy {
        &self.policy
    }

    /// The authoritative credit package table.
    #[must_use]
    pub fn packages(&self) -> &PackageCatalog {
        &self.packages
    }

    // =========================================================================
    // Viewing sessions
    // =========================================================================

    /// Start a viewing session for (user, video).
    ///
    /// Find-or-create: if an open `Started` session already exists for
    /// the pair, it is returned with `resumed: true` so concurrent tabs
    /// cannot produce two independent award paths for the same watch.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the video does not exist or is not
    /// playable.
    pub fn start_session(&self, user_id: &UserId, video_id: &VideoId) -> Result<SessionStart> {
        let video = self
            .store
            .get_video(video_id)?
            .filter(|v| v.playable)
            .ok_or_else(|| EngineError::NotFound {
                entity: "video",
                id: video_id.to_string(),
            })?;

        self.store.get_or_create_account(user_id)?;

        let existing = self.store.find_open_session(user_id, video_id)?;
        let session = self.store.start_session(user_id, video_id)?;
        let resumed = existing.is_some();

        tracing::info!(
            user_id = %user_id,
            video_id = %video_id,
            session_id = %session.id,
            duration_seconds = %video.duration_seconds,
            resumed = %resumed,
            "Viewing session started"
        );

        Ok(SessionStart { session, resumed })
    }

    /// Complete a viewing session and award the view credit.
    ///
    /// The client calls this when it observes the watch threshold
    /// crossed (or on video end), possibly from several event handlers
    /// at once; completion is idempotent. An already-completed session
    /// returns `credit_awarded: false` with the current balance. When
    /// two calls race, the ledger's idempotency guard picks exactly one
    /// winner.
    ///
    /// The reported watch time is advisory; it is checked against the
    /// policy thresholds but not independently verified server-side.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown session.
    /// - `Validation` when the reported watch time does not meet either
    ///   threshold; the session stays `Started` and may be retried.
    pub fn complete_session(
        &self,
        session_id: &SessionId,
        watched_seconds: u32,
    ) -> Result<Completion> {
        let session = self
            .store
            .get_session(session_id)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "session",
                id: session_id.to_string(),
            })?;

        if session.is_completed() {
            let balance = self.store.get_or_create_account(&session.user_id)?.balance;
            return Ok(Completion {
                credit_awarded: false,
                new_balance: balance,
            });
        }

        let video = self
            .store
            .get_video(&session.video_id)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "video",
                id: session.video_id.to_string(),
            })?;

        if !self
            .policy
            .qualifies_for_award(watched_seconds, video.duration_seconds)
        {
            return Err(EngineError::Validation(format!(
                "watched {watched_seconds}s of a {}s video; threshold is {}s or {:.0}%",
                video.duration_seconds,
                self.policy.min_watch_seconds,
                self.policy.min_watch_fraction * 100.0
            )));
        }

        // The award settles the session id as its event key; whichever
        // racing call lands first gets applied=true. The state
        // transition follows the ledger so a crash between the two
        // converges on retry without double-crediting.
        let amount = self.policy.view_award_amount();
        let tx = CreditTransaction::view_award(session.user_id, amount, session.id, session.video_id);
        let outcome = self.store.award(&tx)?;
        self.store.complete_session(session_id)?;

        if outcome.applied {
            tracing::info!(
                user_id = %session.user_id,
                session_id = %session_id,
                video_id = %session.video_id,
                amount = %amount,
                new_balance = %outcome.new_balance,
                "View credit awarded"
            );
        } else {
            tracing::debug!(
                session_id = %session_id,
                "Completion replay, award already settled"
            );
        }

        Ok(Completion {
            credit_awarded: outcome.applied,
            new_balance: outcome.new_balance,
        })
    }

    // =========================================================================
    // Purchases
    // =========================================================================

    /// Reconcile a payment-provider confirmation into a ledger award.
    ///
    /// Every declared amount is revalidated against the authoritative
    /// package table before any mutation; see
    /// [`PaymentConfirmation`]. Safe to call any number of times with
    /// the same confirmation: replays return
    /// `already_processed: true` without re-awarding.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the package is unknown, the charged
    /// amount does not match the package price, or the declared credit
    /// total does not match the package.
    pub fn reconcile_purchase(&self, confirmation: &PaymentConfirmation) -> Result<Purchase> {
        let package = self.packages.get(&confirmation.package_id).ok_or_else(|| {
            tracing::warn!(
                provider_transaction_id = %confirmation.provider_transaction_id,
                package_id = %confirmation.package_id,
                "Purchase confirmation names unknown package"
            );
            EngineError::Validation(format!("unknown package: {}", confirmation.package_id))
        })?;

        if confirmation.amount_charged_cents != package.price_cents {
            tracing::warn!(
                provider_transaction_id = %confirmation.provider_transaction_id,
                package_id = %confirmation.package_id,
                amount_charged_cents = %confirmation.amount_charged_cents,
                expected_cents = %package.price_cents,
                "Purchase confirmation charged amount mismatch"
            );
            return Err(EngineError::Validation(format!(
                "charged amount {} does not match package price {}",
                confirmation.amount_charged_cents, package.price_cents
            )));
        }

        if confirmation.declared_total_credits != package.total_credits() {
            tracing::warn!(
                provider_transaction_id = %confirmation.provider_transaction_id,
                package_id = %confirmation.package_id,
                declared_credits = %confirmation.declared_credits,
                declared_bonus = %confirmation.declared_bonus,
                declared_total_credits = %confirmation.declared_total_credits,
                expected_credits = %package.total_credits(),
                "Purchase confirmation credit total mismatch"
            );
            return Err(EngineError::Validation(format!(
                "declared credits {} do not match package total {}",
                confirmation.declared_total_credits,
                package.total_credits()
            )));
        }

        let amount = self.policy.purchase_award_amount(package);
        let tx = CreditTransaction::purchase(
            confirmation.user_id,
            amount,
            &package.id,
            &confirmation.provider_transaction_id,
        );
        let outcome = self.store.award(&tx)?;

        if outcome.applied {
            tracing::info!(
                user_id = %confirmation.user_id,
                provider_transaction_id = %confirmation.provider_transaction_id,
                package_id = %package.id,
                credits = %amount,
                new_balance = %outcome.new_balance,
                "Purchase credited"
            );
        } else {
            tracing::info!(
                provider_transaction_id = %confirmation.provider_transaction_id,
                "Purchase confirmation replayed, already processed"
            );
        }

        Ok(Purchase {
            credits: amount,
            new_balance: outcome.new_balance,
            already_processed: !outcome.applied,
        })
    }

    // =========================================================================
    // Spends and queries
    // =========================================================================

    /// Spend credits to boost a video's visibility.
    ///
    /// The cost comes from the policy, never from client input.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown video or a user with no account.
    /// - `InsufficientCredits` when the balance is short; the balance
    ///   is left unchanged.
    pub fn boost_video(&self, user_id: &UserId, video_id: &VideoId) -> Result<Boost> {
        self.store
            .get_video(video_id)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "video",
                id: video_id.to_string(),
            })?;

        let cost = self.policy.boost_cost();
        let tx = CreditTransaction::boost_spend(*user_id, cost, *video_id);
        let outcome = self.store.spend(&tx)?;

        tracing::info!(
            user_id = %user_id,
            video_id = %video_id,
            cost = %cost,
            new_balance = %outcome.new_balance,
            "Boost purchased"
        );

        Ok(Boost {
            cost,
            new_balance: outcome.new_balance,
        })
    }

    /// Get a user's balance summary.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a user with no account.
    pub fn get_balance(&self, user_id: &UserId) -> Result<Balance> {
        let account = self
            .store
            .get_account(user_id)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "account",
                id: user_id.to_string(),
            })?;

        Ok(Balance {
            balance: account.balance,
            lifetime_earned: account.lifetime_earned,
        })
    }

    /// List a user's ledger entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a user with no account.
    pub fn list_transactions(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CreditTransaction>> {
        self.store
            .get_account(user_id)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "account",
                id: user_id.to_string(),
            })?;

        Ok(self.store.list_transactions_by_user(user_id, limit, offset)?)
    }

    /// Register (or update) a video catalog record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    pub fn register_video(&self, video: &VideoMeta) -> Result<()> {
        self.store.put_video(video)?;
        tracing::info!(
            video_id = %video.id,
            duration_seconds = %video.duration_seconds,
            playable = %video.playable,
            "Video registered"
        );
        Ok(())
    }
}
