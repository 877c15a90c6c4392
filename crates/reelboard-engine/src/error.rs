//! Error types for the credit engine.

use reelboard_store::StoreError;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the credit engine.
///
/// Already-settled outcomes (duplicate completion, replayed payment
/// confirmation) are not errors; they come back as data on the outcome
/// structs so retrying callers converge safely.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A referenced entity (video, session, account) does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity.
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// Input failed validation before any mutation. Client-correctable.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Spend attempted with too few credits. Expected user-facing
    /// failure, not a system fault.
    #[error("insufficient credits: balance={balance}, required={required}")]
    InsufficientCredits {
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// Underlying storage failure. Transient; the caller may retry.
    #[error("storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::InsufficientCredits { balance, required } => {
                Self::InsufficientCredits { balance, required }
            }
            other => Self::Store(other),
        }
    }
}
