//! Error types for the card ledger
//!
//! This module defines all error types that can occur while validating and
//! posting transactions. Errors are designed to be descriptive for CLI output
//! and to carry a stable reason code for calling layers.
//!
//! # Error Categories
//!
//! - **Business rejections**: over-limit, expired account, nothing to pay,
//!   duplicate transaction. The request is refused and state is unchanged.
//! - **Data errors**: malformed stored dates, unknown accounts.
//! - **Arithmetic errors**: overflow in balance calculations.
//! - **Infrastructure errors**: storage faults, file I/O, CSV parsing.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::transaction::{AccountId, TransactionId};

/// Main error type for the card ledger
///
/// This enum represents all possible errors that can occur during
/// transaction evaluation, posting, bill payment, and interest runs.
/// Each variant includes relevant context to diagnose the outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Transaction would exceed the account's credit limit
    ///
    /// This is a business rejection - the transaction is refused and the
    /// account state remains unchanged.
    #[error("Credit limit exceeded for account {account}: limit {credit_limit}, projected exposure {projected}")]
    Overlimit {
        /// Account ID
        account: AccountId,
        /// Configured credit limit
        credit_limit: Decimal,
        /// Projected cycle exposure including this transaction
        projected: Decimal,
    },

    /// Account was expired on the transaction date
    ///
    /// This is a business rejection - the transaction is refused.
    #[error("Account {account} expired on {expired_on}, cannot accept transaction dated {transaction_date}")]
    AccountExpired {
        /// Account ID
        account: AccountId,
        /// Expiration date on file
        expired_on: String,
        /// Date portion of the transaction timestamp
        transaction_date: String,
    },

    /// A stored or supplied date could not be parsed
    ///
    /// Malformed dates are rejected explicitly rather than treated as
    /// approval. This is a business rejection.
    #[error("Invalid {field} '{value}'")]
    InvalidDate {
        /// Which date field was malformed
        field: String,
        /// The unparseable value
        value: String,
    },

    /// Bill payment requested on an account with no outstanding balance
    ///
    /// This is a business rejection, not a fault - there is simply
    /// nothing to pay.
    #[error("Nothing to pay for account {account}: balance is {balance}")]
    NothingToPay {
        /// Account ID
        account: AccountId,
        /// Current balance (zero or negative)
        balance: Decimal,
    },

    /// Duplicate transaction ID encountered
    ///
    /// Transaction IDs are globally unique. This is a business rejection -
    /// the duplicate is refused before any balance is touched.
    #[error("Duplicate transaction ID {tx} for account {account}")]
    DuplicateTransaction {
        /// Transaction ID that is duplicated
        tx: TransactionId,
        /// Account ID
        account: AccountId,
    },

    /// Referenced account does not exist in storage
    #[error("Unknown account {account}")]
    UnknownAccount {
        /// Account ID that was not found
        account: AccountId,
    },

    /// Arithmetic overflow would occur
    ///
    /// The operation is rejected to maintain ledger integrity.
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account ID
        account: AccountId,
    },

    /// Storage collaborator failed to load or save a record
    ///
    /// This is a fault, reported distinctly from business rejections.
    #[error("Storage failure: {message}")]
    Storage {
        /// Description of the storage failure
        message: String,
    },

    /// I/O error occurred while reading or writing files
    ///
    /// This is typically a fatal error (file permissions, disk full, etc.).
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// In batch runs this is recoverable - the malformed record is skipped
    /// and processing continues with the next record.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

// Conversion from io::Error to LedgerError
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to LedgerError
impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        // Extract line number if available
        let line = error.position().map(|pos| pos.line());

        LedgerError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Stable reason code for this error
    ///
    /// Calling layers relay these codes verbatim; they never change even if
    /// the display message wording does.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Overlimit { .. } => "OVERLIMIT",
            LedgerError::AccountExpired { .. } => "ACCOUNT_EXPIRED",
            LedgerError::InvalidDate { .. } => "INVALID_DATE",
            LedgerError::NothingToPay { .. } => "NOTHING_TO_PAY",
            LedgerError::DuplicateTransaction { .. } => "DUPLICATE_TRANSACTION",
            LedgerError::UnknownAccount { .. } => "UNKNOWN_ACCOUNT",
            LedgerError::ArithmeticOverflow { .. } => "ARITHMETIC_OVERFLOW",
            LedgerError::Storage { .. } => "STORAGE",
            LedgerError::Io { .. } => "IO",
            LedgerError::Parse { .. } => "PARSE",
        }
    }

    /// Whether this error is a business rejection rather than a fault
    ///
    /// Rejections are expected outcomes of the rules: the request was
    /// understood and refused, and no state changed. Faults indicate the
    /// ledger itself could not do its job.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            LedgerError::Overlimit { .. }
                | LedgerError::AccountExpired { .. }
                | LedgerError::InvalidDate { .. }
                | LedgerError::NothingToPay { .. }
                | LedgerError::DuplicateTransaction { .. }
        )
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an Overlimit error
    pub fn overlimit(account: AccountId, credit_limit: Decimal, projected: Decimal) -> Self {
        LedgerError::Overlimit {
            account,
            credit_limit,
            projected,
        }
    }

    /// Create an AccountExpired error
    pub fn account_expired(account: AccountId, expired_on: &str, transaction_date: &str) -> Self {
        LedgerError::AccountExpired {
            account,
            expired_on: expired_on.to_string(),
            transaction_date: transaction_date.to_string(),
        }
    }

    /// Create an InvalidDate error
    pub fn invalid_date(field: &str, value: &str) -> Self {
        LedgerError::InvalidDate {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Create a NothingToPay error
    pub fn nothing_to_pay(account: AccountId, balance: Decimal) -> Self {
        LedgerError::NothingToPay { account, balance }
    }

    /// Create a DuplicateTransaction error
    pub fn duplicate_transaction(tx: TransactionId, account: AccountId) -> Self {
        LedgerError::DuplicateTransaction { tx, account }
    }

    /// Create an UnknownAccount error
    pub fn unknown_account(account: AccountId) -> Self {
        LedgerError::UnknownAccount { account }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: AccountId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account,
        }
    }

    /// Create a Storage error
    pub fn storage(message: &str) -> Self {
        LedgerError::Storage {
            message: message.to_string(),
        }
    }
}
