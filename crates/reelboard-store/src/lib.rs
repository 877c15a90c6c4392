//! `RocksDB` storage layer for the Reelboard credit award engine.
//!
//! This crate provides persistent storage for accounts, the credit
//! transaction ledger, viewing sessions, and the idempotency guard,
//! using `RocksDB` with column families for efficient indexing.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `accounts`: Account records, keyed by `user_id`
//! - `transactions`: Ledger entries, keyed by `transaction_id` (ULID)
//! - `transactions_by_user`: Index for listing transactions by user
//! - `sessions`: Viewing sessions, keyed by `session_id` (ULID)
//! - `open_sessions`: Index of the open session per (user, video)
//! - `event_keys`: Settled event keys for idempotency
//! - `videos`: Video catalog records, keyed by `video_id`
//!
//! Credit-affecting operations (`award`, `spend`) commit the ledger
//! entry, the balance update, and the idempotency marker in a single
//! `WriteBatch`, so a crash can never leave a transaction without its
//! balance update or vice versa.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use reelboard_core::{
    Account, CreditTransaction, SessionId, TransactionId, UserId, VideoId, VideoMeta,
    ViewingSession,
};

/// Outcome of an award attempt.
#[derive(Debug, Clone, Copy)]
pub struct AwardOutcome {
    /// `true` if this call inserted the transaction and moved the
    /// balance; `false` if the event key was already settled and the
    /// call was an idempotent no-op.
    pub applied: bool,
    /// The balance after the operation (unchanged when not applied).
    pub new_balance: i64,
}

/// Outcome of a successful spend.
#[derive(Debug, Clone, Copy)]
pub struct SpendOutcome {
    /// The balance after the deduction.
    pub new_balance: i64,
}

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing the engine to run
/// against different implementations.
pub trait Store: Send + Sync {
    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Get an account by user ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_account(&self, user_id: &UserId) -> Result<Option<Account>>;

    /// Get an account, creating an empty one if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_or_create_account(&self, user_id: &UserId) -> Result<Account>;

    // =========================================================================
    // Ledger Operations
    // =========================================================================

    /// Award credits atomically, guarded by the transaction's event key.
    ///
    /// If a prior transaction already settles the event key, returns
    /// `applied: false` with the current balance and writes nothing.
    /// Otherwise inserts the ledger entry, marks the event key settled,
    /// and increments the balance (and lifetime-earned counter for
    /// earning types) in one atomic batch. Creates the account if it
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidTransaction` if the transaction has
    /// no event key or a non-positive amount.
    fn award(&self, transaction: &CreditTransaction) -> Result<AwardOutcome>;

    /// Spend credits atomically. The transaction's amount must be
    /// negative; the ledger entry and the balance decrement land in the
    /// same batch.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the account doesn't exist.
    /// - `StoreError::InsufficientCredits` if the balance is too low;
    ///   the balance is left unchanged.
    /// - `StoreError::InvalidTransaction` for a non-negative amount.
    fn spend(&self, transaction: &CreditTransaction) -> Result<SpendOutcome>;

    /// Get a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<CreditTransaction>>;

    /// Get the transaction that settled an event key, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_transaction_by_event_key(&self, event_key: &str)
        -> Result<Option<CreditTransaction>>;

    /// List transactions for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CreditTransaction>>;

    /// Check whether an event key has been settled.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn has_event_key(&self, event_key: &str) -> Result<bool>;

    // =========================================================================
    // Viewing Session Operations
    // =========================================================================

    /// Start a viewing session with find-or-create semantics.
    ///
    /// If an open `Started` session already exists for (user, video),
    /// that session is returned instead of creating a duplicate.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn start_session(&self, user_id: &UserId, video_id: &VideoId) -> Result<ViewingSession>;

    /// Get a session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_session(&self, session_id: &SessionId) -> Result<Option<ViewingSession>>;

    /// Find the open `Started` session for (user, video), if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_open_session(
        &self,
        user_id: &UserId,
        video_id: &VideoId,
    ) -> Result<Option<ViewingSession>>;

    /// Transition a session `Started -> Completed` atomically.
    ///
    /// Returns `true` on the first transition, `false` if the session
    /// was already completed (idempotent).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the session doesn't exist.
    fn complete_session(&self, session_id: &SessionId) -> Result<bool>;

    // =========================================================================
    // Video Catalog Operations
    // =========================================================================

    /// Insert or update a video catalog record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_video(&self, video: &VideoMeta) -> Result<()>;

    /// Get a video catalog record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_video(&self, video_id: &VideoId) -> Result<Option<VideoMeta>>;
}
