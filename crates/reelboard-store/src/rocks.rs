//! `RocksDB` storage implementation.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use reelboard_core::{
    Account, CreditTransaction, SessionId, TransactionId, UserId, VideoId, VideoMeta,
    ViewingSession,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{AwardOutcome, SpendOutcome, Store};

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,

    /// Serializes compound read-modify-write cycles (award, spend,
    /// session start/complete). Concurrent mutations for the same user
    /// must not interleave between the read and the batch commit.
    mutation_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            mutation_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Acquire the mutation lock. A poisoned lock only means another
    /// thread panicked before its batch committed; the stored data is
    /// still consistent, so recover the guard.
    fn lock_mutations(&self) -> std::sync::MutexGuard<'_, ()> {
        self.mutation_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Read an account without taking the mutation lock.
    fn load_account(&self, user_id: &UserId) -> Result<Option<Account>> {
        let cf = self.cf(cf::ACCOUNTS)?;
        self.db
            .get_cf(&cf, keys::account_key(user_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Read a session without taking the mutation lock.
    fn load_session(&self, session_id: &SessionId) -> Result<Option<ViewingSession>> {
        let cf = self.cf(cf::SESSIONS)?;
        self.db
            .get_cf(&cf, keys::session_key(session_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Read the settled-event marker for an event key, returning the
    /// settling transaction id.
    fn load_event_key(&self, event_key: &str) -> Result<Option<TransactionId>> {
        let cf = self.cf(cf::EVENT_KEYS)?;
        let value = self
            .db
            .get_cf(&cf, keys::event_key_key(event_key))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        match value {
            Some(bytes) if bytes.len() == 16 => {
                let mut buf = [0u8; 16];
                buf.copy_from_slice(&bytes);
                let id = TransactionId::from_bytes(buf)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Some(id))
            }
            Some(_) => Err(StoreError::Serialization(
                "malformed event key marker".into(),
            )),
            None => Ok(None),
        }
    }

    /// Stage a ledger entry (transaction row + user index) into a batch.
    fn stage_transaction(&self, batch: &mut WriteBatch, tx: &CreditTransaction) -> Result<()> {
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;

        let tx_key = keys::transaction_key(&tx.id);
        let user_tx_key = keys::user_transaction_key(&tx.user_id, &tx.id);
        let value = Self::serialize(tx)?;

        batch.put_cf(&cf_tx, &tx_key, &value);
        batch.put_cf(&cf_by_user, &user_tx_key, []); // Index entry (empty value)

        Ok(())
    }

    /// Stage an account record into a batch.
    fn stage_account(&self, batch: &mut WriteBatch, account: &Account) -> Result<()> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let value = Self::serialize(account)?;
        batch.put_cf(&cf, keys::account_key(&account.user_id), &value);
        Ok(())
    }

    fn commit(&self, batch: WriteBatch) -> Result<()> {
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn find_open_session_inner(
        &self,
        user_id: &UserId,
        video_id: &VideoId,
    ) -> Result<Option<ViewingSession>> {
        let cf_open = self.cf(cf::OPEN_SESSIONS)?;
        let value = self
            .db
            .get_cf(&cf_open, keys::open_session_key(user_id, video_id))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let Some(bytes) = value else {
            return Ok(None);
        };

        if bytes.len() != 16 {
            return Err(StoreError::Serialization(
                "malformed open session marker".into(),
            ));
        }

        let mut buf = [0u8; 16];
        buf.copy_from_slice(&bytes);
        let session_id =
            SessionId::from_bytes(buf).map_err(|e| StoreError::Serialization(e.to_string()))?;

        // The index entry is removed on completion; an entry pointing at
        // a completed session means a partial state, treat it as no open
        // session rather than resurrecting it.
        match self.load_session(&session_id)? {
            Some(session) if !session.is_completed() => Ok(Some(session)),
            _ => Ok(None),
        }
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Account Operations
    // =========================================================================

    fn get_account(&self, user_id: &UserId) -> Result<Option<Account>> {
        self.load_account(user_id)
    }

    fn get_or_create_account(&self, user_id: &UserId) -> Result<Account> {
        if let Some(account) = self.load_account(user_id)? {
            return Ok(account);
        }

        let _guard = self.lock_mutations();

        // Re-check under the lock; another thread may have created it.
        if let Some(account) = self.load_account(user_id)? {
            return Ok(account);
        }

        let account = Account::new(*user_id);
        let mut batch = WriteBatch::default();
        self.stage_account(&mut batch, &account)?;
        self.commit(batch)?;

        Ok(account)
    }

    // =========================================================================
    // Ledger Operations
    // =========================================================================

    fn award(&self, transaction: &CreditTransaction) -> Result<AwardOutcome> {
        let event_key = transaction.event_key.as_deref().ok_or_else(|| {
            StoreError::InvalidTransaction("award transaction has no event key".into())
        })?;
        if transaction.amount <= 0 {
            return Err(StoreError::InvalidTransaction(format!(
                "award amount must be positive, got {}",
                transaction.amount
            )));
        }

        let _guard = self.lock_mutations();

        // Idempotency guard: at most one ledger entry per event key.
        if self.load_event_key(event_key)?.is_some() {
            let balance = self
                .load_account(&transaction.user_id)?
                .map_or(0, |account| account.balance);
            return Ok(AwardOutcome {
                applied: false,
                new_balance: balance,
            });
        }

        let mut account = self
            .load_account(&transaction.user_id)?
            .unwrap_or_else(|| Account::new(transaction.user_id));

        account.balance += transaction.amount;
        if transaction.transaction_type.is_earning() {
            account.lifetime_earned += transaction.amount;
        }
        account.updated_at = Utc::now();

        let cf_events = self.cf(cf::EVENT_KEYS)?;

        let mut batch = WriteBatch::default();
        self.stage_account(&mut batch, &account)?;
        self.stage_transaction(&mut batch, transaction)?;
        batch.put_cf(
            &cf_events,
            keys::event_key_key(event_key),
            transaction.id.to_bytes(),
        );

        self.commit(batch)?;

        tracing::debug!(
            user_id = %transaction.user_id,
            amount = %transaction.amount,
            event_key = %event_key,
            new_balance = %account.balance,
            "Award applied"
        );

        Ok(AwardOutcome {
            applied: true,
            new_balance: account.balance,
        })
    }

    fn spend(&self, transaction: &CreditTransaction) -> Result<SpendOutcome> {
        if transaction.amount >= 0 {
            return Err(StoreError::InvalidTransaction(format!(
                "spend amount must be negative, got {}",
                transaction.amount
            )));
        }
        let required = transaction.amount.abs();

        let _guard = self.lock_mutations();

        let mut account =
            self.load_account(&transaction.user_id)?
                .ok_or_else(|| StoreError::NotFound {
                    entity: "account",
                    id: transaction.user_id.to_string(),
                })?;

        if !account.has_sufficient_credits(required) {
            return Err(StoreError::InsufficientCredits {
                balance: account.balance,
                required,
            });
        }

        account.balance -= required;
        account.updated_at = Utc::now();

        let mut batch = WriteBatch::default();
        self.stage_account(&mut batch, &account)?;
        self.stage_transaction(&mut batch, transaction)?;

        self.commit(batch)?;

        tracing::debug!(
            user_id = %transaction.user_id,
            amount = %required,
            new_balance = %account.balance,
            "Spend applied"
        );

        Ok(SpendOutcome {
            new_balance: account.balance,
        })
    }

    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<CreditTransaction>> {
        let cf = self.cf(cf::TRANSACTIONS)?;
        self.db
            .get_cf(&cf, keys::transaction_key(transaction_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn get_transaction_by_event_key(
        &self,
        event_key: &str,
    ) -> Result<Option<CreditTransaction>> {
        match self.load_event_key(event_key)? {
            Some(tx_id) => self.get_transaction(&tx_id),
            None => Ok(None),
        }
    }

    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CreditTransaction>> {
        let cf_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;
        let prefix = keys::user_transactions_prefix(user_id);

        let iter = self.db.iterator_cf(
            &cf_by_user,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        // ULIDs sort chronologically, so the index is oldest-first;
        // collect matching keys then reverse for newest-first.
        let mut all_keys: Vec<Vec<u8>> = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            all_keys.push(key.to_vec());
        }

        all_keys.reverse();

        let mut transactions = Vec::new();
        for key in all_keys.into_iter().skip(offset) {
            if transactions.len() >= limit {
                break;
            }

            let tx_id = keys::extract_transaction_id_from_user_key(&key);
            if let Some(tx) = self.get_transaction(&tx_id)? {
                transactions.push(tx);
            }
        }

        Ok(transactions)
    }

    fn has_event_key(&self, event_key: &str) -> Result<bool> {
        Ok(self.load_event_key(event_key)?.is_some())
    }

    // =========================================================================
    // Viewing Session Operations
    // =========================================================================

    fn start_session(&self, user_id: &UserId, video_id: &VideoId) -> Result<ViewingSession> {
        let _guard = self.lock_mutations();

        // Find-or-create: a second start for the same (user, video)
        // while a session is open returns the open session instead of
        // creating a second independent award path.
        if let Some(open) = self.find_open_session_inner(user_id, video_id)? {
            return Ok(open);
        }

        let session = ViewingSession::new(*user_id, *video_id);

        let cf_sessions = self.cf(cf::SESSIONS)?;
        let cf_open = self.cf(cf::OPEN_SESSIONS)?;
        let value = Self::serialize(&session)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_sessions, keys::session_key(&session.id), &value);
        batch.put_cf(
            &cf_open,
            keys::open_session_key(user_id, video_id),
            session.id.to_bytes(),
        );

        self.commit(batch)?;

        Ok(session)
    }

    fn get_session(&self, session_id: &SessionId) -> Result<Option<ViewingSession>> {
        self.load_session(session_id)
    }

    fn find_open_session(
        &self,
        user_id: &UserId,
        video_id: &VideoId,
    ) -> Result<Option<ViewingSession>> {
        self.find_open_session_inner(user_id, video_id)
    }

    fn complete_session(&self, session_id: &SessionId) -> Result<bool> {
        let _guard = self.lock_mutations();

        let mut session = self
            .load_session(session_id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "session",
                id: session_id.to_string(),
            })?;

        if !session.complete() {
            return Ok(false);
        }

        let cf_sessions = self.cf(cf::SESSIONS)?;
        let cf_open = self.cf(cf::OPEN_SESSIONS)?;
        let value = Self::serialize(&session)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_sessions, keys::session_key(session_id), &value);
        batch.delete_cf(
            &cf_open,
            keys::open_session_key(&session.user_id, &session.video_id),
        );

        self.commit(batch)?;

        Ok(true)
    }

    // =========================================================================
    // Video Catalog Operations
    // =========================================================================

    fn put_video(&self, video: &VideoMeta) -> Result<()> {
        let cf = self.cf(cf::VIDEOS)?;
        let value = Self::serialize(video)?;

        self.db
            .put_cf(&cf, keys::video_key(&video.id), value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_video(&self, video_id: &VideoId) -> Result<Option<VideoMeta>> {
        let cf = self.cf(cf::VIDEOS)?;
        self.db
            .get_cf(&cf, keys::video_key(video_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }
}
