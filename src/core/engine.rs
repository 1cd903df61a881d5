//! Ledger orchestration engine
//!
//! This module provides the LedgerEngine that coordinates validation,
//! balance application, the transaction journal, and interest runs over a
//! `LedgerStore`.
//!
//! The engine enforces the rule sequence for each operation:
//! - Posting: credit limit and expiration checks, then journal, then the
//!   atomic balance application
//! - Bill payment: eligibility check, then full payoff
//! - Interest: per-category accrual from the rate table, posted as one sum
//!
//! Every mutation runs inside the store's per-account exclusive scope, so
//! validate-then-apply cannot interleave with another request for the same
//! account.

use crate::core::store::LedgerStore;
use crate::core::{interest, processor, validator};
use crate::types::{
    Account, AccountId, CategoryBalance, CategoryCode, CategoryKey, LedgerError, RateKey,
    Transaction, TransactionRequest, TypeCode,
};
use log::{debug, warn};
use rust_decimal::Decimal;

/// Outcome of a successful posting
///
/// Snapshots taken inside the exclusive scope, so the three pieces are
/// mutually consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    /// The journaled transaction record
    pub transaction: Transaction,

    /// Account state after application
    pub account: Account,

    /// Category balance after application
    pub category: CategoryBalance,
}

/// Outcome of a successful bill payment
#[derive(Debug, Clone, PartialEq)]
pub struct BillPayment {
    /// Account state after the payoff
    pub account: Account,

    /// Amount that was paid (the balance at the time of the call)
    pub amount_paid: Decimal,
}

/// One category's line in an interest run
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryInterest {
    /// Transaction type code
    pub type_code: TypeCode,

    /// Transaction category code
    pub category: CategoryCode,

    /// Category balance the accrual was computed from
    pub balance: Decimal,

    /// Annual rate resolved from the disclosure table
    ///
    /// `None` when the table has no entry for this category; `Some(0)` when
    /// an entry exists but prices at zero. Both accrue nothing.
    pub annual_rate_percent: Option<Decimal>,

    /// Interest accrued for this category
    pub interest: Decimal,
}

/// Outcome of a monthly interest run for one account
#[derive(Debug, Clone, PartialEq)]
pub struct InterestRun {
    /// Account state after the total was posted
    pub account: Account,

    /// Sum of all per-category accruals, posted to the balance once
    pub total: Decimal,

    /// Per-category breakdown, sorted by (type, category)
    pub by_category: Vec<CategoryInterest>,
}

/// Ledger processing engine
///
/// Orchestrates the posting rules over a storage collaborator. The engine
/// itself is stateless; cloning or sharing it is a matter of sharing the
/// store.
pub struct LedgerEngine<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> LedgerEngine<S> {
    /// Create an engine over a storage collaborator
    pub fn new(store: S) -> Self {
        LedgerEngine { store }
    }

    /// Run all posting validations against current state, without applying
    ///
    /// Checks run in order: credit limit, then expiration. The outcome
    /// reflects the account at the moment of the call; a subsequent
    /// `post_transaction` re-validates inside the exclusive scope.
    ///
    /// # Errors
    ///
    /// Returns the first failing check's error, or
    /// `LedgerError::UnknownAccount` if the account does not exist.
    pub fn evaluate(&self, request: &TransactionRequest) -> Result<(), LedgerError> {
        let account = self.store.account(request.account_id)?;
        validate_for_posting(&account, request)
    }

    /// Validate and apply one transaction as a single serialized unit
    ///
    /// Inside the account's exclusive scope: run the credit limit and
    /// expiration checks, journal the transaction (rejecting duplicate
    /// IDs before anything moves), then apply the amount to the balance,
    /// the matching cycle accumulator, and the category balance in one
    /// atomic step. If the application faults, the journal claim is
    /// released before the error propagates, so a rejection or fault at
    /// any point leaves every record exactly as it was and the ID stays
    /// available for a retry.
    ///
    /// # Arguments
    ///
    /// * `request` - The candidate transaction
    ///
    /// # Returns
    ///
    /// The journaled record plus consistent post-application snapshots of
    /// the account and category balance.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Overlimit`, `LedgerError::AccountExpired`,
    /// `LedgerError::InvalidDate`, or `LedgerError::DuplicateTransaction`
    /// as business rejections; `LedgerError::UnknownAccount` or
    /// `LedgerError::ArithmeticOverflow` as faults.
    pub fn post_transaction(&self, request: &TransactionRequest) -> Result<Posting, LedgerError> {
        self.store.update_account(request.account_id, |account| {
            validate_for_posting(account, request)?;

            // Journal before any balance moves: a duplicate ID is refused
            // while all state is still untouched.
            let posted = Transaction::from_request(request);
            self.store.insert_transaction(posted.clone())?;

            let key = CategoryKey::new(request.account_id, request.type_code, request.category);
            let category = self
                .store
                .update_category(key, |category| {
                    processor::apply_transaction(account, category, request.amount)?;
                    Ok(category.clone())
                })
                .map_err(|error| {
                    // Nothing applied, so the journal must not keep the
                    // record; otherwise a retry would be refused as a
                    // duplicate of a posting that never happened.
                    if let Err(release) = self.store.remove_transaction(posted.transaction_id) {
                        warn!(
                            "could not release journal claim for transaction {}: {}",
                            posted.transaction_id, release
                        );
                    }
                    error
                })?;

            debug!(
                "posted transaction {} to account {}: amount {}, balance {}",
                posted.transaction_id, posted.account_id, posted.amount, account.balance
            );

            Ok(Posting {
                transaction: posted,
                account: account.clone(),
                category,
            })
        })
    }

    /// Pay the outstanding balance in full
    ///
    /// Inside the account's exclusive scope: check that there is a positive
    /// balance to pay, then zero it. Cycle accumulators and category
    /// balances are untouched, and no journal record is created.
    ///
    /// # Returns
    ///
    /// The account after the payoff and the amount paid.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NothingToPay` when the balance is zero or
    /// negative, or `LedgerError::UnknownAccount`.
    pub fn pay_bill_in_full(&self, account_id: AccountId) -> Result<BillPayment, LedgerError> {
        self.store.update_account(account_id, |account| {
            validator::validate_bill_payment(account)?;
            let amount_paid = processor::pay_in_full(account);

            debug!("paid bill in full for account {}: {}", account_id, amount_paid);

            Ok(BillPayment {
                account: account.clone(),
                amount_paid,
            })
        })
    }

    /// Run the monthly interest cycle for one account
    ///
    /// Inside the account's exclusive scope: enumerate the account's
    /// category balances, resolve each one's rate from the disclosure
    /// table under the account's rate group, accrue
    /// `balance * rate / 1200` per category, and post the sum to the
    /// balance once. Category balances are not reset; categories without a
    /// table entry or with a zero rate accrue nothing.
    ///
    /// # Returns
    ///
    /// The account after posting plus the per-category breakdown, sorted
    /// by (type, category).
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnknownAccount` or
    /// `LedgerError::ArithmeticOverflow`.
    pub fn run_monthly_interest(&self, account_id: AccountId) -> Result<InterestRun, LedgerError> {
        self.store.update_account(account_id, |account| {
            let mut balances = self.store.category_balances_for(account_id)?;
            balances.sort_by_key(|balance| (balance.key.type_code, balance.key.category));

            let mut total = Decimal::ZERO;
            let mut by_category = Vec::with_capacity(balances.len());

            for entry in balances {
                let rate_key = RateKey::new(
                    &account.rate_group,
                    entry.key.type_code,
                    entry.key.category,
                );
                let rate = self.store.rate_entry(&rate_key)?;

                let accrued = match rate.as_ref() {
                    Some(found) if interest::should_apply_interest(Some(found)) => {
                        interest::monthly_interest(entry.balance, found.annual_rate_percent)
                            .ok_or_else(|| {
                                LedgerError::arithmetic_overflow("interest accrual", account_id)
                            })?
                    }
                    Some(_) => {
                        debug!(
                            "zero rate for account {} type {} category {}, no interest",
                            account_id, entry.key.type_code, entry.key.category
                        );
                        Decimal::ZERO
                    }
                    None => {
                        debug!(
                            "no rate entry for group {} type {} category {}, no interest",
                            account.rate_group, entry.key.type_code, entry.key.category
                        );
                        Decimal::ZERO
                    }
                };

                total = total.checked_add(accrued).ok_or_else(|| {
                    LedgerError::arithmetic_overflow("interest total", account_id)
                })?;
                by_category.push(CategoryInterest {
                    type_code: entry.key.type_code,
                    category: entry.key.category,
                    balance: entry.balance,
                    annual_rate_percent: rate.map(|found| found.annual_rate_percent),
                    interest: accrued,
                });
            }

            interest::post_to_account(account, total)?;

            debug!(
                "monthly interest for account {}: total {} across {} categories",
                account_id,
                total,
                by_category.len()
            );

            Ok(InterestRun {
                account: account.clone(),
                total,
                by_category,
            })
        })
    }
}

/// The posting checks, in order: credit limit, then expiration
fn validate_for_posting(
    account: &Account,
    request: &TransactionRequest,
) -> Result<(), LedgerError> {
    validator::validate_credit_limit(account, request.amount)?;
    validator::validate_expiration(account, &request.originated_at)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::MemoryStore;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn seeded_account() -> Account {
        Account {
            account_id: 1,
            balance: Decimal::new(25000, 2),
            credit_limit: Decimal::new(500000, 2),
            cash_credit_limit: Decimal::new(100000, 2),
            cycle_credit: Decimal::new(100000, 2),
            cycle_debit: Decimal::new(50000, 2),
            open_date: "2020-01-15".to_string(),
            expiration_date: "2030-01-31".to_string(),
            reissue_date: None,
            billing_zip: "10001".to_string(),
            rate_group: "STANDARD".to_string(),
        }
    }

    fn request(transaction_id: u64, amount: Decimal) -> TransactionRequest {
        TransactionRequest {
            transaction_id,
            account_id: 1,
            type_code: 10,
            category: 100,
            amount,
            originated_at: "2026-03-01 10:00:00".to_string(),
            processed_at: "2026-03-01 10:00:01".to_string(),
        }
    }

    fn store_with_account() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_account(seeded_account());
        store
    }

    #[test]
    fn test_post_approved_transaction() {
        let store = store_with_account();
        let engine = LedgerEngine::new(&store);

        let posting = engine
            .post_transaction(&request(1, Decimal::new(10000, 2)))
            .unwrap();

        // balance 250.00 + 100.00, cycle credit 1000.00 + 100.00
        assert_eq!(posting.account.balance, Decimal::new(35000, 2));
        assert_eq!(posting.account.cycle_credit, Decimal::new(110000, 2));
        assert_eq!(posting.account.cycle_debit, Decimal::new(50000, 2));
        assert_eq!(posting.category.balance, Decimal::new(10000, 2));
        assert_eq!(posting.transaction.transaction_id, 1);

        // The snapshots match what the store now holds
        assert_eq!(store.account(1).unwrap(), posting.account);
        assert_eq!(store.transaction(1).unwrap(), posting.transaction);
    }

    #[test]
    fn test_post_debit_routes_to_cycle_debit() {
        let store = store_with_account();
        let engine = LedgerEngine::new(&store);

        let posting = engine
            .post_transaction(&request(1, Decimal::new(-20000, 2)))
            .unwrap();

        // signed amount: 500.00 + -200.00
        assert_eq!(posting.account.balance, Decimal::new(5000, 2));
        assert_eq!(posting.account.cycle_credit, Decimal::new(100000, 2));
        assert_eq!(posting.account.cycle_debit, Decimal::new(30000, 2));
        assert_eq!(posting.category.balance, Decimal::new(-20000, 2));
    }

    #[test]
    fn test_post_overlimit_rejected_without_mutation() {
        let store = store_with_account();
        let engine = LedgerEngine::new(&store);
        let before = store.account(1).unwrap();

        // 1000.00 - 500.00 + 4600.01 = 5100.01 > 5000.00
        let result = engine.post_transaction(&request(1, Decimal::new(460001, 2)));

        assert_eq!(
            result.unwrap_err(),
            LedgerError::overlimit(1, Decimal::new(500000, 2), Decimal::new(510001, 2))
        );
        assert_eq!(store.account(1).unwrap(), before);
        assert_eq!(store.transaction_count(), 0);
        // Rejection happened before the category was even touched
        assert!(store.category_balances_for(1).unwrap().is_empty());
    }

    #[test]
    fn test_post_to_expired_account_rejected() {
        let store = MemoryStore::new();
        let mut account = seeded_account();
        account.expiration_date = "2025-12-31".to_string();
        store.insert_account(account);
        let engine = LedgerEngine::new(&store);

        let mut late = request(1, Decimal::new(10000, 2));
        late.originated_at = "2026-01-01 00:00:00".to_string();
        let result = engine.post_transaction(&late);

        assert_eq!(
            result.unwrap_err(),
            LedgerError::account_expired(1, "2025-12-31", "2026-01-01")
        );
        assert_eq!(store.transaction_count(), 0);
    }

    #[test]
    fn test_post_with_malformed_stored_date_rejected() {
        let store = MemoryStore::new();
        let mut account = seeded_account();
        account.expiration_date = "soon".to_string();
        store.insert_account(account.clone());
        let engine = LedgerEngine::new(&store);

        let result = engine.post_transaction(&request(1, Decimal::new(10000, 2)));

        assert_eq!(
            result.unwrap_err(),
            LedgerError::invalid_date("expiration date", "soon")
        );
        assert_eq!(store.account(1).unwrap(), account);
    }

    #[test]
    fn test_post_duplicate_id_rejected_without_mutation() {
        let store = store_with_account();
        let engine = LedgerEngine::new(&store);

        engine
            .post_transaction(&request(7, Decimal::new(10000, 2)))
            .unwrap();
        let after_first = store.account(1).unwrap();

        let result = engine.post_transaction(&request(7, Decimal::new(5000, 2)));

        assert_eq!(result.unwrap_err(), LedgerError::duplicate_transaction(7, 1));
        assert_eq!(store.account(1).unwrap(), after_first);
        assert_eq!(store.transaction_count(), 1);
        // The journal still holds the first occurrence
        assert_eq!(
            store.transaction(7).unwrap().amount,
            Decimal::new(10000, 2)
        );
    }

    #[test]
    fn test_post_to_unknown_account() {
        let store = MemoryStore::new();
        let engine = LedgerEngine::new(&store);

        let result = engine.post_transaction(&request(1, Decimal::new(10000, 2)));

        assert_eq!(result.unwrap_err(), LedgerError::unknown_account(1));
    }

    #[test]
    fn test_post_overflow_fault_leaves_journal_clean() {
        let store = MemoryStore::new();
        let mut account = seeded_account();
        account.balance = Decimal::MAX;
        store.insert_account(account.clone());
        let engine = LedgerEngine::new(&store);

        // Passes the credit limit and expiration checks, then faults on
        // the balance addition
        let result = engine.post_transaction(&request(42, Decimal::new(100, 2)));

        assert!(matches!(
            result,
            Err(LedgerError::ArithmeticOverflow { .. })
        ));
        assert_eq!(store.account(1).unwrap(), account);
        // The journal must not keep a transaction whose effects never
        // applied
        assert!(store.transaction(42).is_none());
        assert_eq!(store.transaction_count(), 0);
        assert!(store.category_balances_for(1).unwrap().is_empty());
    }

    #[test]
    fn test_post_retry_after_fault_reuses_the_id() {
        let store = MemoryStore::new();
        let mut account = seeded_account();
        account.balance = Decimal::MAX;
        store.insert_account(account);
        let engine = LedgerEngine::new(&store);

        assert!(engine
            .post_transaction(&request(42, Decimal::new(100, 2)))
            .is_err());

        // Once the balance can absorb the amount, the same ID posts
        store
            .update_account(1, |account| {
                account.balance = Decimal::new(25000, 2);
                Ok(())
            })
            .unwrap();
        let posting = engine
            .post_transaction(&request(42, Decimal::new(100, 2)))
            .unwrap();

        assert_eq!(posting.transaction.transaction_id, 42);
        assert_eq!(posting.account.balance, Decimal::new(25100, 2));
        assert_eq!(store.transaction_count(), 1);
    }

    #[rstest]
    #[case::approved(Decimal::new(10000, 2), true)]
    #[case::overlimit(Decimal::new(460001, 2), false)]
    fn test_evaluate_never_mutates(#[case] amount: Decimal, #[case] approved: bool) {
        let store = store_with_account();
        let engine = LedgerEngine::new(&store);
        let before = store.account(1).unwrap();

        let result = engine.evaluate(&request(1, amount));

        assert_eq!(result.is_ok(), approved);
        assert_eq!(store.account(1).unwrap(), before);
        assert_eq!(store.transaction_count(), 0);
    }

    #[test]
    fn test_pay_bill_in_full() {
        let store = MemoryStore::new();
        let mut account = seeded_account();
        account.balance = Decimal::new(150000, 2);
        store.insert_account(account);
        let engine = LedgerEngine::new(&store);

        let payment = engine.pay_bill_in_full(1).unwrap();

        assert_eq!(payment.amount_paid, Decimal::new(150000, 2));
        assert_eq!(payment.account.balance, Decimal::ZERO);
        // Cycle accumulators survive the payoff
        assert_eq!(payment.account.cycle_credit, Decimal::new(100000, 2));
        assert_eq!(payment.account.cycle_debit, Decimal::new(50000, 2));
    }

    #[test]
    fn test_second_bill_payment_has_nothing_to_pay() {
        let store = MemoryStore::new();
        let mut account = seeded_account();
        account.balance = Decimal::new(150000, 2);
        store.insert_account(account);
        let engine = LedgerEngine::new(&store);

        engine.pay_bill_in_full(1).unwrap();
        let result = engine.pay_bill_in_full(1);

        assert_eq!(
            result.unwrap_err(),
            LedgerError::nothing_to_pay(1, Decimal::ZERO)
        );
        assert_eq!(store.account(1).unwrap().balance, Decimal::ZERO);
    }

    fn store_for_interest() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_account(seeded_account());
        store.insert_rate(crate::types::RateEntry::new(
            RateKey::new("STANDARD", 10, 100),
            Decimal::new(1200, 2),
        ));
        store.insert_rate(crate::types::RateEntry::new(
            RateKey::new("STANDARD", 10, 200),
            Decimal::new(1800, 2),
        ));
        store.insert_rate(crate::types::RateEntry::new(
            RateKey::new("STANDARD", 10, 300),
            Decimal::ZERO,
        ));
        store
    }

    fn seed_category(store: &MemoryStore, category: CategoryCode, balance: Decimal) {
        store
            .update_category(CategoryKey::new(1, 10, category), |entry| {
                entry.balance = balance;
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_monthly_interest_sums_categories_and_posts_once() {
        let store = store_for_interest();
        // 100.00 at 12% -> 1.00; 33.33 at 18% -> 0.50
        seed_category(&store, 100, Decimal::new(10000, 2));
        seed_category(&store, 200, Decimal::new(3333, 2));
        let engine = LedgerEngine::new(&store);

        let run = engine.run_monthly_interest(1).unwrap();

        assert_eq!(run.total, Decimal::new(150, 2));
        // balance 250.00 + 1.50
        assert_eq!(run.account.balance, Decimal::new(25150, 2));
        assert_eq!(run.by_category.len(), 2);
        assert_eq!(run.by_category[0].interest, Decimal::new(100, 2));
        assert_eq!(run.by_category[1].interest, Decimal::new(50, 2));

        // Interest never routes through the cycle accumulators
        assert_eq!(run.account.cycle_credit, Decimal::new(100000, 2));
        assert_eq!(run.account.cycle_debit, Decimal::new(50000, 2));
    }

    #[test]
    fn test_monthly_interest_leaves_category_balances() {
        let store = store_for_interest();
        seed_category(&store, 100, Decimal::new(10000, 2));
        let engine = LedgerEngine::new(&store);

        engine.run_monthly_interest(1).unwrap();

        let balances = store.category_balances_for(1).unwrap();
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].balance, Decimal::new(10000, 2));
    }

    #[test]
    fn test_monthly_interest_distinguishes_missing_and_zero_rates() {
        let store = store_for_interest();
        // category 300 has a zero-rate entry, category 999 has none
        seed_category(&store, 300, Decimal::new(50000, 2));
        seed_category(&store, 999, Decimal::new(50000, 2));
        let engine = LedgerEngine::new(&store);

        let run = engine.run_monthly_interest(1).unwrap();

        assert_eq!(run.total, Decimal::ZERO);
        assert_eq!(run.account.balance, Decimal::new(25000, 2));
        assert_eq!(run.by_category[0].annual_rate_percent, Some(Decimal::ZERO));
        assert_eq!(run.by_category[0].interest, Decimal::ZERO);
        assert_eq!(run.by_category[1].annual_rate_percent, None);
        assert_eq!(run.by_category[1].interest, Decimal::ZERO);
    }

    #[test]
    fn test_monthly_interest_with_no_categories() {
        let store = store_for_interest();
        let engine = LedgerEngine::new(&store);

        let run = engine.run_monthly_interest(1).unwrap();

        assert_eq!(run.total, Decimal::ZERO);
        assert!(run.by_category.is_empty());
        assert_eq!(run.account.balance, Decimal::new(25000, 2));
    }

    #[test]
    fn test_monthly_interest_breakdown_is_sorted() {
        let store = store_for_interest();
        seed_category(&store, 200, Decimal::new(10000, 2));
        seed_category(&store, 100, Decimal::new(10000, 2));
        let engine = LedgerEngine::new(&store);

        let run = engine.run_monthly_interest(1).unwrap();

        let categories: Vec<CategoryCode> =
            run.by_category.iter().map(|line| line.category).collect();
        assert_eq!(categories, vec![100, 200]);
    }

    #[test]
    fn test_posting_after_interest_keeps_working() {
        let store = store_for_interest();
        seed_category(&store, 100, Decimal::new(10000, 2));
        let engine = LedgerEngine::new(&store);

        engine.run_monthly_interest(1).unwrap();
        let posting = engine
            .post_transaction(&request(9, Decimal::new(2500, 2)))
            .unwrap();

        // 250.00 + 1.00 interest + 25.00 posting
        assert_eq!(posting.account.balance, Decimal::new(27600, 2));
        // Category picked up the posting on top of its prior balance
        assert_eq!(posting.category.balance, Decimal::new(12500, 2));
    }
}
