//! Error types for Reelboard storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record (account, session, video).
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// Insufficient credits for a spend. Expected user-facing failure,
    /// not a system fault.
    #[error("insufficient credits: balance={balance}, required={required}")]
    InsufficientCredits {
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// A transaction handed to `award`/`spend` violates their contract
    /// (missing event key, wrong amount sign). Programming error, never
    /// user input.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
}
