//! Transaction-related types for the card ledger
//!
//! This module defines the identifier aliases, the candidate request a
//! caller submits, and the immutable posted record the journal keeps.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account identifier
///
/// Supports account IDs from 0 to 4,294,967,295
pub type AccountId = u32;

/// Transaction identifier
///
/// Globally unique across all accounts
pub type TransactionId = u64;

/// Transaction type code (e.g. purchase, cash advance, fee)
pub type TypeCode = u16;

/// Transaction category code within a type (e.g. retail, grocery)
pub type CategoryCode = u16;

/// Candidate transaction submitted for posting
///
/// Carries everything the rules need: the signed amount (non-negative for
/// credits, negative for debits), the classification used for category
/// aggregation and rate lookup, and the timestamps. `processed_at` is
/// stamped by the request layer; the core never reads a clock.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    /// Unique transaction identifier
    pub transaction_id: TransactionId,

    /// The account this transaction applies to
    pub account_id: AccountId,

    /// Transaction type code
    pub type_code: TypeCode,

    /// Transaction category code
    pub category: CategoryCode,

    /// Signed amount with 2 decimal places
    pub amount: Decimal,

    /// When the transaction originated, `YYYY-MM-DD HH:MM:SS`
    ///
    /// The date portion of this timestamp is what expiration screening
    /// compares against.
    pub originated_at: String,

    /// When the ledger processed the transaction, `YYYY-MM-DD HH:MM:SS`
    pub processed_at: String,
}

/// Posted transaction record
///
/// Created only when a request passes validation and its balance effects
/// commit. Once journaled it is never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier
    pub transaction_id: TransactionId,

    /// The account this transaction was posted to
    pub account_id: AccountId,

    /// Transaction type code
    pub type_code: TypeCode,

    /// Transaction category code
    pub category: CategoryCode,

    /// Signed amount with 2 decimal places
    pub amount: Decimal,

    /// When the transaction originated
    pub originated_at: String,

    /// When the ledger accepted it
    pub processed_at: String,
}

impl Transaction {
    /// Build the posted record for an accepted request
    pub fn from_request(request: &TransactionRequest) -> Self {
        Transaction {
            transaction_id: request.transaction_id,
            account_id: request.account_id,
            type_code: request.type_code,
            category: request.category,
            amount: request.amount,
            originated_at: request.originated_at.clone(),
            processed_at: request.processed_at.clone(),
        }
    }
}
