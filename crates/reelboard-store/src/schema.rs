//! Database schema definitions and column families.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary account records, keyed by `user_id`.
    pub const ACCOUNTS: &str = "accounts";

    /// Credit transactions, keyed by `transaction_id` (ULID).
    pub const TRANSACTIONS: &str = "transactions";

    /// Index: transactions by user, keyed by `user_id || transaction_id`.
    /// Value is empty (index only).
    pub const TRANSACTIONS_BY_USER: &str = "transactions_by_user";

    /// Viewing sessions, keyed by `session_id` (ULID).
    pub const SESSIONS: &str = "sessions";

    /// Index: the open session per (user, video), keyed by
    /// `user_id || video_id`. Value is the session id. Removed when the
    /// session completes.
    pub const OPEN_SESSIONS: &str = "open_sessions";

    /// Settled event keys for idempotency, keyed by the event key string.
    /// Value is the id of the transaction that settled the key.
    pub const EVENT_KEYS: &str = "event_keys";

    /// Video catalog records, keyed by `video_id`.
    pub const VIDEOS: &str = "videos";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::ACCOUNTS,
        cf::TRANSACTIONS,
        cf::TRANSACTIONS_BY_USER,
        cf::SESSIONS,
        cf::OPEN_SESSIONS,
        cf::EVENT_KEYS,
        cf::VIDEOS,
    ]
}
