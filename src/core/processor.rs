//! Balance mutation rules
//!
//! The processor owns the arithmetic that changes account and category
//! state. Every mutation computes all of its new values with checked
//! arithmetic first and assigns only when the whole set succeeds, so an
//! arithmetic fault leaves both records exactly as they were.

use crate::types::{Account, CategoryBalance, LedgerError};
use rust_decimal::Decimal;

/// Apply an approved transaction to an account and its category balance
///
/// One atomic unit, in order:
///
/// 1. `balance += amount`
/// 2. `cycle_credit += amount` when the amount is non-negative, otherwise
///    `cycle_debit += amount` (the signed amount, not its magnitude)
/// 3. `category.balance += amount`
///
/// No rounding is applied; the amount is taken exactly as validated.
///
/// # Errors
///
/// Returns `LedgerError::ArithmeticOverflow` if any accumulator cannot
/// absorb the amount. Neither record is modified in that case.
pub fn apply_transaction(
    account: &mut Account,
    category: &mut CategoryBalance,
    amount: Decimal,
) -> Result<(), LedgerError> {
    let account_id = account.account_id;

    let new_balance = account
        .balance
        .checked_add(amount)
        .ok_or_else(|| LedgerError::arithmetic_overflow("balance update", account_id))?;

    let credit = amount >= Decimal::ZERO;
    let new_cycle = if credit {
        account.cycle_credit.checked_add(amount)
    } else {
        account.cycle_debit.checked_add(amount)
    }
    .ok_or_else(|| LedgerError::arithmetic_overflow("cycle accumulation", account_id))?;

    let new_category_balance = category
        .balance
        .checked_add(amount)
        .ok_or_else(|| LedgerError::arithmetic_overflow("category accumulation", account_id))?;

    account.balance = new_balance;
    if credit {
        account.cycle_credit = new_cycle;
    } else {
        account.cycle_debit = new_cycle;
    }
    category.balance = new_category_balance;

    Ok(())
}

/// Pay the outstanding balance in full
///
/// Returns the amount paid and zeroes the balance. Cycle accumulators and
/// category balances are untouched: a bill payment settles the account, it
/// is not cycle activity.
pub fn pay_in_full(account: &mut Account) -> Decimal {
    let paid = account.balance;
    account.balance = Decimal::ZERO;
    paid
}
