//! Card Ledger Library
//!
//! # Overview
//!
//! This library implements the account-level posting rules of a credit card
//! ledger: transactions are validated against credit limit and card
//! expiration, applied to an account balance, cycle accumulators, and
//! per-category balances, and balances accrue monthly interest from a rate
//! table. A CSV batch driver applies operation files against a seeded
//! ledger either serially or partitioned across worker threads.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Transaction, LedgerError, etc.)
//! - [`cli`] - CLI argument parsing
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Operation orchestration over a storage collaborator
//!   - [`core::validator`] - Credit limit, expiration, and payoff checks
//!   - [`core::processor`] - Balance application and bill payoff arithmetic
//!   - [`core::interest`] - Monthly interest accrual from annual rates
//!   - [`core::memory`] - Thread-safe in-memory store with a transaction journal
//! - [`io`] - CSV reading and closing-balance output
//! - [`strategy`] - Serial and account-partitioned batch scheduling
//!
//! # Operations
//!
//! The engine exposes four operations:
//!
//! - **Evaluate**: Run all posting validations without applying anything
//! - **Post**: Validate and apply a transaction as one serialized unit
//! - **Pay bill in full**: Zero a positive balance, recording the amount paid
//! - **Run monthly interest**: Accrue per-category interest and post the sum
//!
//! # Amounts
//!
//! All money moves as signed `rust_decimal` values with exactly two decimal
//! places. A positive amount is a credit (a purchase raising the balance),
//! a negative amount is a debit (a payment or refund lowering it), and the
//! sign also routes the amount to the matching cycle accumulator.
//!
//! # Outcomes
//!
//! Every refusal carries a stable reason code. Business rejections
//! (`OVERLIMIT`, `ACCOUNT_EXPIRED`, `INVALID_DATE`, `NOTHING_TO_PAY`,
//! `DUPLICATE_TRANSACTION`) leave the ledger untouched and are expected in
//! normal operation; faults (`UNKNOWN_ACCOUNT`, `ARITHMETIC_OVERFLOW`,
//! `STORAGE`, `IO`, `PARSE`) signal a problem with the run itself.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{LedgerEngine, LedgerStore, MemoryStore};
pub use io::write_accounts_csv;
pub use types::{
    Account, AccountId, CategoryBalance, CategoryCode, LedgerError, RateEntry, Transaction,
    TransactionId, TransactionRequest, TypeCode,
};
