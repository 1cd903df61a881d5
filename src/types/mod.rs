//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account state with limits and cycle accumulators
//! - `transaction`: Transaction requests, posted records, and identifiers
//! - `category`: Per-category running balances
//! - `rate`: Interest rate table entries
//! - `error`: Error types for the card ledger

pub mod account;
pub mod category;
pub mod error;
pub mod rate;
pub mod transaction;

pub use account::Account;
pub use category::{CategoryBalance, CategoryKey};
pub use error::LedgerError;
pub use rate::{RateEntry, RateKey};
pub use transaction::{
    AccountId, CategoryCode, Transaction, TransactionId, TransactionRequest, TypeCode,
};
