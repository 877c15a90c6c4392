//! Account types for Reelboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A credit account for a user.
///
/// The balance is a cached projection of the transaction log; it is
/// mutated only through the store's atomic award/spend operations,
/// never written directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// The user ID (from the identity provider).
    pub user_id: UserId,

    /// Current credit balance. Never negative.
    pub balance: i64,

    /// Cumulative lifetime credits earned (views, purchases).
    pub lifetime_earned: i64,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with zero balance.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            balance: 0,
            lifetime_earned: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the account can cover a spend of `amount` credits.
    #[must_use]
    pub fn has_sufficient_credits(&self, amount: i64) -> bool {
        self.balance >= amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_has_zero_balance() {
        let account = Account::new(UserId::generate());
        assert_eq!(account.balance, 0);
        assert_eq!(account.lifetime_earned, 0);
    }

    #[test]
    fn sufficient_credits_boundary() {
        let mut account = Account::new(UserId::generate());
        account.balance = 10;

        assert!(account.has_sufficient_credits(5));
        assert!(account.has_sufficient_credits(10));
        assert!(!account.has_sufficient_credits(11));
    }
}
