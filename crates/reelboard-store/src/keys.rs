//! Key encoding utilities for `RocksDB`.

use reelboard_core::{SessionId, TransactionId, UserId, VideoId};

/// Create an account key from a user ID.
#[must_use]
pub fn account_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a transaction key from a transaction ID.
#[must_use]
pub fn transaction_key(transaction_id: &TransactionId) -> Vec<u8> {
    transaction_id.to_bytes().to_vec()
}

/// Create a user-transaction index key.
///
/// Format: `user_id (16 bytes) || transaction_id (16 bytes)`
///
/// Since ULIDs are time-ordered, transactions for a user sort by time.
#[must_use]
pub fn user_transaction_key(user_id: &UserId, transaction_id: &TransactionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&transaction_id.to_bytes());
    key
}

/// Create a prefix for iterating all transactions for a user.
#[must_use]
pub fn user_transactions_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Extract the transaction ID from a user-transaction index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_transaction_id_from_user_key(key: &[u8]) -> TransactionId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    TransactionId::from_bytes(bytes).expect("valid ULID bytes")
}

/// Create a session key from a session ID.
#[must_use]
pub fn session_key(session_id: &SessionId) -> Vec<u8> {
    session_id.to_bytes().to_vec()
}

/// Create an open-session index key.
///
/// Format: `user_id (16 bytes) || video_id (16 bytes)`
#[must_use]
pub fn open_session_key(user_id: &UserId, video_id: &VideoId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(video_id.as_bytes());
    key
}

/// Create an event-key key from the external event identifier.
#[must_use]
pub fn event_key_key(event_key: &str) -> Vec<u8> {
    event_key.as_bytes().to_vec()
}

/// Create a video key from a video ID.
#[must_use]
pub fn video_key(video_id: &VideoId) -> Vec<u8> {
    video_id.as_bytes().to_vec()
}
