//! In-memory ledger storage for batch processing and tests
//!
//! This module provides `MemoryStore`, a thread-safe `LedgerStore`
//! implementation backed by concurrent maps.
//!
//! # Design
//!
//! Each record family lives in its own `DashMap` (accounts, category
//! balances, rate table, transaction journal). DashMap's internal sharding
//! gives fine-grained locking: threads working on different accounts never
//! contend, while an update closure for one account runs under that entry's
//! lock and is therefore serialized against every other access to it.
//!
//! # Lock ordering
//!
//! An account update closure may touch the category, rate, and journal maps
//! while its account entry is held; those are distinct maps, so no cycle is
//! possible. A closure must never re-enter the map whose entry it holds.

use crate::core::store::LedgerStore;
use crate::types::{
    Account, AccountId, CategoryBalance, CategoryKey, LedgerError, RateEntry, RateKey, Transaction,
    TransactionId,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Thread-safe in-memory implementation of `LedgerStore`
///
/// Accounts and rate entries are seeded up front; category balances appear
/// lazily at zero; the journal grows as transactions post. All methods are
/// safe to call from multiple threads concurrently.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Account records by account ID
    accounts: DashMap<AccountId, Account>,

    /// Per-category running balances
    categories: DashMap<CategoryKey, CategoryBalance>,

    /// Disclosure rate table
    rates: DashMap<RateKey, RateEntry>,

    /// Posted transaction journal
    journal: DashMap<TransactionId, Transaction>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account record, replacing any existing record with that ID
    pub fn insert_account(&self, account: Account) {
        self.accounts.insert(account.account_id, account);
    }

    /// Seed a category balance, replacing any existing record with that key
    pub fn insert_category_balance(&self, balance: CategoryBalance) {
        self.categories.insert(balance.key, balance);
    }

    /// Seed a rate table entry
    pub fn insert_rate(&self, entry: RateEntry) {
        self.rates.insert(entry.key.clone(), entry);
    }

    /// Snapshot of every account, in arbitrary order
    pub fn accounts(&self) -> Vec<Account> {
        self.accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Every seeded account ID, in arbitrary order
    pub fn account_ids(&self) -> Vec<AccountId> {
        self.accounts.iter().map(|entry| *entry.key()).collect()
    }

    /// Look up a journaled transaction
    pub fn transaction(&self, transaction_id: TransactionId) -> Option<Transaction> {
        self.journal
            .get(&transaction_id)
            .map(|entry| entry.value().clone())
    }

    /// Number of journaled transactions
    pub fn transaction_count(&self) -> usize {
        self.journal.len()
    }
}

impl LedgerStore for MemoryStore {
    fn account(&self, account_id: AccountId) -> Result<Account, LedgerError> {
        self.accounts
            .get(&account_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| LedgerError::unknown_account(account_id))
    }

    fn update_account<T, F>(&self, account_id: AccountId, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<T, LedgerError>,
    {
        // Accounts are seeded, never created on demand; the entry guard is
        // the per-account serialization point.
        let mut entry = self
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| LedgerError::unknown_account(account_id))?;
        f(entry.value_mut())
    }

    fn category_balance(&self, key: CategoryKey) -> Result<CategoryBalance, LedgerError> {
        Ok(self
            .categories
            .entry(key)
            .or_insert_with(|| CategoryBalance::zeroed(key))
            .clone())
    }

    fn update_category<T, F>(&self, key: CategoryKey, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut CategoryBalance) -> Result<T, LedgerError>,
    {
        // The entry guard serializes the key either way; a never-seen key
        // is inserted only once the closure commits, so a failed first
        // update leaves no record.
        match self.categories.entry(key) {
            Entry::Occupied(mut occupied) => f(occupied.get_mut()),
            Entry::Vacant(vacant) => {
                let mut fresh = CategoryBalance::zeroed(key);
                let value = f(&mut fresh)?;
                vacant.insert(fresh);
                Ok(value)
            }
        }
    }

    fn category_balances_for(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<CategoryBalance>, LedgerError> {
        Ok(self
            .categories
            .iter()
            .filter(|entry| entry.key().account_id == account_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    fn rate_entry(&self, key: &RateKey) -> Result<Option<RateEntry>, LedgerError> {
        Ok(self.rates.get(key).map(|entry| entry.value().clone()))
    }

    fn insert_transaction(&self, transaction: Transaction) -> Result<(), LedgerError> {
        match self.journal.entry(transaction.transaction_id) {
            Entry::Occupied(_) => Err(LedgerError::duplicate_transaction(
                transaction.transaction_id,
                transaction.account_id,
            )),
            Entry::Vacant(vacant) => {
                vacant.insert(transaction);
                Ok(())
            }
        }
    }

    fn remove_transaction(&self, transaction_id: TransactionId) -> Result<(), LedgerError> {
        self.journal.remove(&transaction_id);
        Ok(())
    }
}
