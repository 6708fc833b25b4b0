//! Wallet types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// The pair of spendable balances associated with a user.
///
/// Both balances are non-negative integers. Wallets are mutated only by
/// progression event application and are created lazily with zero balances
/// on the first mutation or read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    /// The owning user.
    pub user_id: UserId,

    /// Coin balance.
    pub coins: i64,

    /// Diamond balance.
    pub diamonds: i64,

    /// When the wallet was created.
    pub created_at: DateTime<Utc>,

    /// When the wallet was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Create a new wallet with zero balances.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            coins: 0,
            diamonds: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the wallet can cover a coin debit.
    #[must_use]
    pub fn has_sufficient_coins(&self, amount: i64) -> bool {
        self.coins >= amount
    }

    /// Check if the wallet can cover a diamond debit.
    #[must_use]
    pub fn has_sufficient_diamonds(&self, amount: i64) -> bool {
        self.diamonds >= amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_wallet_is_empty() {
        let wallet = Wallet::new(UserId::generate());
        assert_eq!(wallet.coins, 0);
        assert_eq!(wallet.diamonds, 0);
    }

    #[test]
    fn sufficiency_checks() {
        let mut wallet = Wallet::new(UserId::generate());
        wallet.coins = 100;
        wallet.diamonds = 3;

        assert!(wallet.has_sufficient_coins(100));
        assert!(!wallet.has_sufficient_coins(101));
        assert!(wallet.has_sufficient_diamonds(3));
        assert!(!wallet.has_sufficient_diamonds(4));
    }
}
