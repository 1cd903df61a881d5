//! Account-related types for the card ledger
//!
//! This module defines the Account structure holding the balance, credit
//! limits, and cycle accumulators the posting rules operate on.

use super::transaction::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Credit-card account state
///
/// Represents the current state of one account: outstanding balance, the
/// configured limits, the accumulators for the current billing cycle, and
/// the card dates used by expiration screening. Dates are carried as the
/// ISO-8601 strings the surrounding system stores and are parsed on demand,
/// so malformed values surface at validation time instead of load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The account ID (u32)
    pub account_id: AccountId,

    /// Outstanding balance owed on the account
    ///
    /// Grows with debits and interest, shrinks with credits and bill
    /// payments. May be negative when the holder has overpaid.
    pub balance: Decimal,

    /// Total credit limit (always positive)
    pub credit_limit: Decimal,

    /// Cash advance sub-limit, carried but not consulted by posting rules
    pub cash_credit_limit: Decimal,

    /// Sum of non-negative amounts posted this cycle
    pub cycle_credit: Decimal,

    /// Sum of negative amounts posted this cycle
    ///
    /// Receives each debit's signed amount as posted, so a run of debits
    /// drives it downward. Seeded snapshots may carry any starting value.
    pub cycle_debit: Decimal,

    /// Date the account was opened, ISO-8601 (`YYYY-MM-DD`)
    pub open_date: String,

    /// Date the card expires, ISO-8601 (`YYYY-MM-DD`)
    ///
    /// An account accepts transactions through the end of this date.
    pub expiration_date: String,

    /// Date the card was last reissued, if ever
    pub reissue_date: Option<String>,

    /// Billing ZIP code, carried account data
    pub billing_zip: String,

    /// Interest rate group this account prices under (e.g. "STANDARD")
    pub rate_group: String,
}

impl Account {
    /// Create a new account with zero balance and empty cycle accumulators
    ///
    /// # Arguments
    ///
    /// * `account_id` - The account ID
    /// * `credit_limit` - Total credit limit for the account
    /// * `expiration_date` - Card expiration date, `YYYY-MM-DD`
    /// * `rate_group` - Interest rate group tag
    ///
    /// # Returns
    ///
    /// A new Account with zero balance, zero cycle accumulators, and empty
    /// carried fields (open date, reissue date, billing ZIP).
    pub fn new(
        account_id: AccountId,
        credit_limit: Decimal,
        expiration_date: &str,
        rate_group: &str,
    ) -> Self {
        Account {
            account_id,
            balance: Decimal::ZERO,
            credit_limit,
            cash_credit_limit: Decimal::ZERO,
            cycle_credit: Decimal::ZERO,
            cycle_debit: Decimal::ZERO,
            open_date: String::new(),
            expiration_date: expiration_date.to_string(),
            reissue_date: None,
            billing_zip: String::new(),
            rate_group: rate_group.to_string(),
        }
    }

    /// Net cycle exposure: `cycle_credit - cycle_debit`
    ///
    /// This is the quantity the credit-limit check projects forward.
    /// Returns `None` on arithmetic overflow.
    pub fn cycle_exposure(&self) -> Option<Decimal> {
        self.cycle_credit.checked_sub(self.cycle_debit)
    }
}
