//! Account validation rules
//!
//! Pure checks against an account snapshot: credit limit projection,
//! expiration screening, and bill payment eligibility. None of these touch
//! storage or mutate anything; the engine runs them inside the account's
//! exclusive scope before applying any balance effects.

use crate::types::{Account, LedgerError};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// Calendar date format used by account date fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format used by transaction timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Check that a transaction amount fits within the account's credit limit
///
/// The projected exposure is `cycle_credit - cycle_debit + amount`. The
/// transaction is approved if `credit_limit >= projected`, using exact
/// decimal comparison. The check is independent of the current balance;
/// only the cycle accumulators feed it.
///
/// # Errors
///
/// Returns `LedgerError::Overlimit` when the projected exposure exceeds the
/// limit, or `LedgerError::ArithmeticOverflow` if the projection itself
/// cannot be computed.
pub fn validate_credit_limit(account: &Account, amount: Decimal) -> Result<(), LedgerError> {
    let exposure = account
        .cycle_exposure()
        .ok_or_else(|| LedgerError::arithmetic_overflow("cycle exposure", account.account_id))?;
    let projected = exposure
        .checked_add(amount)
        .ok_or_else(|| LedgerError::arithmetic_overflow("projected exposure", account.account_id))?;

    if account.credit_limit >= projected {
        Ok(())
    } else {
        Err(LedgerError::overlimit(
            account.account_id,
            account.credit_limit,
            projected,
        ))
    }
}

/// Check that the account is not expired on the transaction date
///
/// Only the date portions are compared: an account expiring 2025-12-31
/// accepts transactions through the end of that day and rejects anything
/// dated 2026-01-01 or later. The timestamp may be a full
/// `YYYY-MM-DD HH:MM:SS` value or a bare date.
///
/// # Errors
///
/// Returns `LedgerError::AccountExpired` for transactions after the
/// expiration date, or `LedgerError::InvalidDate` when either the stored
/// expiration date or the supplied timestamp fails to parse. Malformed
/// dates are a hard rejection, never an approval.
pub fn validate_expiration(account: &Account, timestamp: &str) -> Result<(), LedgerError> {
    let expiration = NaiveDate::parse_from_str(&account.expiration_date, DATE_FORMAT)
        .map_err(|_| LedgerError::invalid_date("expiration date", &account.expiration_date))?;
    let transaction_date = parse_date_portion("transaction timestamp", timestamp)?;

    if expiration >= transaction_date {
        Ok(())
    } else {
        Err(LedgerError::account_expired(
            account.account_id,
            &account.expiration_date,
            &transaction_date.format(DATE_FORMAT).to_string(),
        ))
    }
}

/// Check that the account has a balance worth paying off
///
/// Bill payment is only meaningful while the holder owes something. A zero
/// or negative (overpaid) balance is refused as a business outcome.
///
/// # Errors
///
/// Returns `LedgerError::NothingToPay` when the balance is not positive.
pub fn validate_bill_payment(account: &Account) -> Result<(), LedgerError> {
    if account.balance > Decimal::ZERO {
        Ok(())
    } else {
        Err(LedgerError::nothing_to_pay(
            account.account_id,
            account.balance,
        ))
    }
}

/// Extract the calendar date from a timestamp or bare date string
fn parse_date_portion(field: &str, value: &str) -> Result<NaiveDate, LedgerError> {
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT) {
        return Ok(timestamp.date());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| LedgerError::invalid_date(field, value))
}
