//! Storage collaborator trait for the card ledger
//!
//! This module defines the trait abstraction between the rule core and
//! whatever holds the records. The engine is generic over it, so the rules
//! can be exercised against the in-memory store in tests and batch runs and
//! against a durable implementation elsewhere.
//!
//! # Exclusivity contract
//!
//! Mutations go through scoped update closures rather than load/save pairs.
//! `update_account` runs its closure while holding exclusive access to that
//! account record; `update_category` does the same per category key. The
//! validate-then-apply sequence for one account therefore executes as a
//! single serialized unit, and two concurrent requests against the same
//! account cannot interleave between validation and application.

use crate::types::{
    Account, AccountId, CategoryBalance, CategoryKey, LedgerError, RateEntry, RateKey, Transaction,
    TransactionId,
};

/// Storage operations the ledger engine requires
///
/// Implementations must serialize closure execution per account and per
/// category key. Closures must leave the record unmodified when they return
/// an error; the store does not snapshot or roll back.
pub trait LedgerStore {
    /// Load an account snapshot by ID
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnknownAccount` if no account exists.
    fn account(&self, account_id: AccountId) -> Result<Account, LedgerError>;

    /// Update an account using a closure, under per-account exclusivity
    ///
    /// The closure receives a mutable reference to the account and runs
    /// while no other thread can observe or modify that account. Unlike
    /// categories, accounts are never created on demand: posting against
    /// an unknown account is an error.
    ///
    /// The closure may call `update_category`, `rate_entry`, and
    /// `insert_transaction` on the same store, but must not re-enter the
    /// account map.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnknownAccount` if no account exists, or
    /// whatever error the closure returns.
    fn update_account<T, F>(&self, account_id: AccountId, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<T, LedgerError>;

    /// Load a category balance, creating a zero record if absent
    ///
    /// The first reference to an (account, type, category) combination
    /// observes a balance of zero.
    fn category_balance(&self, key: CategoryKey) -> Result<CategoryBalance, LedgerError>;

    /// Update a category balance using a closure, under per-key exclusivity
    ///
    /// A key never seen before presents a zero record to the closure, but
    /// the record is kept only when the closure succeeds: a failed first
    /// update leaves no category behind.
    fn update_category<T, F>(&self, key: CategoryKey, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut CategoryBalance) -> Result<T, LedgerError>;

    /// All category balances recorded for an account
    ///
    /// Order is unspecified; callers that need determinism sort the result.
    fn category_balances_for(&self, account_id: AccountId)
        -> Result<Vec<CategoryBalance>, LedgerError>;

    /// Look up a disclosure rate entry
    ///
    /// Returns `Ok(None)` when the table has no entry for the key. Absence
    /// is a normal outcome, not an error.
    fn rate_entry(&self, key: &RateKey) -> Result<Option<RateEntry>, LedgerError>;

    /// Journal a posted transaction
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::DuplicateTransaction` if the transaction ID has
    /// already been journaled. The existing record is kept unchanged.
    fn insert_transaction(&self, transaction: Transaction) -> Result<(), LedgerError>;

    /// Remove a journaled transaction
    ///
    /// Releases a journal claim whose balance application could not
    /// complete, so the ID becomes available again. Removing an ID that is
    /// not journaled is a no-op.
    fn remove_transaction(&self, transaction_id: TransactionId) -> Result<(), LedgerError>;
}

impl<S: LedgerStore> LedgerStore for &S {
    fn account(&self, account_id: AccountId) -> Result<Account, LedgerError> {
        (**self).account(account_id)
    }

    fn update_account<T, F>(&self, account_id: AccountId, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<T, LedgerError>,
    {
        (**self).update_account(account_id, f)
    }

    fn category_balance(&self, key: CategoryKey) -> Result<CategoryBalance, LedgerError> {
        (**self).category_balance(key)
    }

    fn update_category<T, F>(&self, key: CategoryKey, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut CategoryBalance) -> Result<T, LedgerError>,
    {
        (**self).update_category(key, f)
    }

    fn category_balances_for(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<CategoryBalance>, LedgerError> {
        (**self).category_balances_for(account_id)
    }

    fn rate_entry(&self, key: &RateKey) -> Result<Option<RateEntry>, LedgerError> {
        (**self).rate_entry(key)
    }

    fn insert_transaction(&self, transaction: Transaction) -> Result<(), LedgerError> {
        (**self).insert_transaction(transaction)
    }

    fn remove_transaction(&self, transaction_id: TransactionId) -> Result<(), LedgerError> {
        (**self).remove_transaction(transaction_id)
    }
}

impl<S: LedgerStore> LedgerStore for std::sync::Arc<S> {
    fn account(&self, account_id: AccountId) -> Result<Account, LedgerError> {
        (**self).account(account_id)
    }

    fn update_account<T, F>(&self, account_id: AccountId, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<T, LedgerError>,
    {
        (**self).update_account(account_id, f)
    }

    fn category_balance(&self, key: CategoryKey) -> Result<CategoryBalance, LedgerError> {
        (**self).category_balance(key)
    }

    fn update_category<T, F>(&self, key: CategoryKey, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut CategoryBalance) -> Result<T, LedgerError>,
    {
        (**self).update_category(key, f)
    }

    fn category_balances_for(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<CategoryBalance>, LedgerError> {
        (**self).category_balances_for(account_id)
    }

    fn rate_entry(&self, key: &RateKey) -> Result<Option<RateEntry>, LedgerError> {
        (**self).rate_entry(key)
    }

    fn insert_transaction(&self, transaction: Transaction) -> Result<(), LedgerError> {
        (**self).insert_transaction(transaction)
    }

    fn remove_transaction(&self, transaction_id: TransactionId) -> Result<(), LedgerError> {
        (**self).remove_transaction(transaction_id)
    }
}
