//! Category balance types for the card ledger
//!
//! Running per-category totals feed the monthly interest computation.
//! A balance record is created lazily, at zero, the first time a
//! transaction posts to its (account, type, category) combination.

use super::transaction::{AccountId, CategoryCode, TypeCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identity of one category balance
///
/// One record exists per (account, transaction type, category) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryKey {
    /// Owning account
    pub account_id: AccountId,

    /// Transaction type code
    pub type_code: TypeCode,

    /// Transaction category code
    pub category: CategoryCode,
}

impl CategoryKey {
    /// Create a category key
    pub fn new(account_id: AccountId, type_code: TypeCode, category: CategoryCode) -> Self {
        CategoryKey {
            account_id,
            type_code,
            category,
        }
    }
}

/// Running balance for one category of one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBalance {
    /// Identity of this balance
    pub key: CategoryKey,

    /// Accumulated signed amount posted to this category
    pub balance: Decimal,
}

impl CategoryBalance {
    /// Create a zeroed balance record for a key
    ///
    /// This is the lazy-creation form used when a transaction references a
    /// category the account has never posted to.
    pub fn zeroed(key: CategoryKey) -> Self {
        CategoryBalance {
            key,
            balance: Decimal::ZERO,
        }
    }
}
