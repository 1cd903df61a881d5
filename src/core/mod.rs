//! Core business logic module
//!
//! This module contains the ledger rule components:
//! - `store` - Storage collaborator trait with the exclusivity contract
//! - `memory` - Thread-safe in-memory store implementation
//! - `validator` - Pure account checks (credit limit, expiration, payoff)
//! - `processor` - Balance mutation rules
//! - `interest` - Monthly interest arithmetic
//! - `engine` - Operation orchestration over a store

pub mod engine;
pub mod interest;
pub mod memory;
pub mod processor;
pub mod store;
pub mod validator;

pub use engine::{BillPayment, CategoryInterest, InterestRun, LedgerEngine, Posting};
pub use memory::MemoryStore;
pub use store::LedgerStore;
