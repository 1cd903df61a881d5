//! Monthly interest computation
//!
//! Interest accrues per category balance from the disclosure rate table:
//! `balance * annual_rate / 1200`, rounded half-up to cents. The pure
//! arithmetic lives here; the engine owns rate resolution, summing across
//! categories, and posting under the account's exclusive scope.

use crate::types::{Account, LedgerError, RateEntry};
use rust_decimal::{Decimal, RoundingStrategy};

/// Annualization divisor: 12 months times 100 percentage points
const ANNUALIZATION_DIVISOR: Decimal = Decimal::from_parts(1200, 0, 0, false, 0);

/// Whether a rate lookup result calls for interest accrual
///
/// Interest applies only when the table has an entry for the key and that
/// entry's rate is non-zero. A missing entry and a zero rate both mean no
/// interest, but they are distinct outcomes the engine reports separately.
pub fn should_apply_interest(rate: Option<&RateEntry>) -> bool {
    match rate {
        Some(entry) => !entry.annual_rate_percent.is_zero(),
        None => false,
    }
}

/// One month of interest on a category balance
///
/// A zero rate short-circuits to zero before any division, so the result
/// carries no rounding artifacts. Otherwise the monthly amount is
/// `balance * annual_rate_percent / 1200` rounded to 2 decimal places with
/// midpoint away from zero (0.005 becomes 0.01).
///
/// Returns `None` if the intermediate product overflows.
pub fn monthly_interest(balance: Decimal, annual_rate_percent: Decimal) -> Option<Decimal> {
    if annual_rate_percent.is_zero() {
        return Some(Decimal::ZERO);
    }

    let annualized = balance.checked_mul(annual_rate_percent)?;
    let monthly = annualized.checked_div(ANNUALIZATION_DIVISOR)?;
    Some(monthly.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Post accrued interest straight onto the account balance
///
/// Interest is not cycle activity: the amount lands on `balance` only and
/// is never routed through the cycle accumulators.
///
/// # Errors
///
/// Returns `LedgerError::ArithmeticOverflow` if the balance cannot absorb
/// the amount; the account is left unchanged.
pub fn post_to_account(account: &mut Account, total: Decimal) -> Result<(), LedgerError> {
    let new_balance = account.balance.checked_add(total).ok_or_else(|| {
        LedgerError::arithmetic_overflow("interest posting", account.account_id)
    })?;
    account.balance = new_balance;
    Ok(())
}
