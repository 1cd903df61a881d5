//! CSV format handling for batch input files and account output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Row structures for deserializing operations, account seeds, and rates
//! - Conversion from rows to domain types
//! - Closing-balance output serialization
//!
//! All functions are pure (no I/O) for easy testing. Money fields are
//! normalized to exactly 2 decimal places at this boundary; rows carrying
//! finer precision are rejected rather than silently rounded.

use crate::types::{
    Account, AccountId, CategoryCode, LedgerError, RateEntry, RateKey, TransactionId,
    TransactionRequest, TypeCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// One operation the batch driver can perform
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerOp {
    /// Post a transaction through validation and application
    Post(TransactionRequest),

    /// Pay the account's balance in full
    PayBill {
        /// Account to pay off
        account_id: AccountId,
    },
}

impl LedgerOp {
    /// The account this operation targets
    ///
    /// Partitioned runs group operations by this id so that each account's
    /// rows stay on one worker, in file order.
    pub fn account_id(&self) -> AccountId {
        match self {
            LedgerOp::Post(request) => request.account_id,
            LedgerOp::PayBill { account_id } => *account_id,
        }
    }
}

/// CSV row for the operations file
///
/// Matches the input format with columns:
/// `op, tx, account, type, category, amount, originated`
///
/// Most fields are optional at this layer because `billpay` rows carry only
/// the op and the account; presence is enforced per op during conversion.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OperationRecord {
    pub op: String,
    pub tx: Option<TransactionId>,
    pub account: AccountId,
    #[serde(rename = "type")]
    pub type_code: Option<TypeCode>,
    pub category: Option<CategoryCode>,
    pub amount: Option<String>,
    pub originated: Option<String>,
}

/// CSV row for the account seed file
///
/// Columns: `account, balance, credit_limit, cash_credit_limit,
/// cycle_credit, cycle_debit, open_date, expiration_date, reissue_date,
/// billing_zip, rate_group`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccountRecord {
    pub account: AccountId,
    pub balance: String,
    pub credit_limit: String,
    pub cash_credit_limit: Option<String>,
    pub cycle_credit: Option<String>,
    pub cycle_debit: Option<String>,
    pub open_date: Option<String>,
    pub expiration_date: String,
    pub reissue_date: Option<String>,
    pub billing_zip: Option<String>,
    pub rate_group: String,
}

/// CSV row for the rate table file
///
/// Columns: `rate_group, type, category, annual_rate`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RateRecord {
    pub rate_group: String,
    #[serde(rename = "type")]
    pub type_code: TypeCode,
    pub category: CategoryCode,
    pub annual_rate: String,
}

/// Convert an OperationRecord to a LedgerOp
///
/// `post` rows require a transaction id, type, category, amount, and
/// origination timestamp. `billpay` rows need only the account; any stray
/// fields on them are ignored. The caller supplies the processing
/// timestamp, which is stamped onto every post.
///
/// # Arguments
///
/// * `record` - The deserialized CSV row
/// * `processed_at` - Processing timestamp for post operations
///
/// # Returns
///
/// Result containing either:
/// - Ok(LedgerOp) - Successfully converted operation
/// - Err(String) - Error message describing the conversion failure
pub fn convert_operation_record(
    record: OperationRecord,
    processed_at: &str,
) -> Result<LedgerOp, String> {
    match record.op.to_lowercase().as_str() {
        "post" => {
            let transaction_id = record.tx.ok_or_else(|| {
                format!("post for account {} requires a transaction id", record.account)
            })?;
            let type_code = record
                .type_code
                .ok_or_else(|| format!("post transaction {} requires a type", transaction_id))?;
            let category = record
                .category
                .ok_or_else(|| format!("post transaction {} requires a category", transaction_id))?;
            let amount = match record.amount {
                Some(ref amount_str) if !amount_str.trim().is_empty() => {
                    parse_money(amount_str, &format!("amount for transaction {}", transaction_id))?
                }
                _ => {
                    return Err(format!(
                        "post transaction {} for account {} requires an amount",
                        transaction_id, record.account
                    ))
                }
            };
            let originated_at = match record.originated {
                Some(originated) if !originated.trim().is_empty() => originated,
                _ => {
                    return Err(format!(
                        "post transaction {} requires an origination timestamp",
                        transaction_id
                    ))
                }
            };

            Ok(LedgerOp::Post(TransactionRequest {
                transaction_id,
                account_id: record.account,
                type_code,
                category,
                amount,
                originated_at,
                processed_at: processed_at.to_string(),
            }))
        }
        "billpay" => Ok(LedgerOp::PayBill {
            account_id: record.account,
        }),
        other => Err(format!(
            "Invalid operation '{}' for account {}",
            other, record.account
        )),
    }
}

/// Convert an AccountRecord to an Account
///
/// Money fields are normalized to 2 decimal places; missing optional money
/// fields default to zero and missing date/text fields to empty. The
/// credit limit must be positive.
pub fn convert_account_record(record: AccountRecord) -> Result<Account, String> {
    let context = format!("account {}", record.account);

    let balance = parse_money(&record.balance, &format!("balance for {}", context))?;
    let credit_limit =
        parse_money(&record.credit_limit, &format!("credit limit for {}", context))?;
    if credit_limit <= Decimal::ZERO {
        return Err(format!("Credit limit must be positive for {}", context));
    }
    let cash_credit_limit = parse_optional_money(
        record.cash_credit_limit.as_deref(),
        &format!("cash credit limit for {}", context),
    )?;
    let cycle_credit = parse_optional_money(
        record.cycle_credit.as_deref(),
        &format!("cycle credit for {}", context),
    )?;
    let cycle_debit = parse_optional_money(
        record.cycle_debit.as_deref(),
        &format!("cycle debit for {}", context),
    )?;

    if record.rate_group.trim().is_empty() {
        return Err(format!("Rate group is required for {}", context));
    }

    Ok(Account {
        account_id: record.account,
        balance,
        credit_limit,
        cash_credit_limit,
        cycle_credit,
        cycle_debit,
        open_date: record.open_date.unwrap_or_default(),
        expiration_date: record.expiration_date,
        reissue_date: record.reissue_date.filter(|date| !date.trim().is_empty()),
        billing_zip: record.billing_zip.unwrap_or_default(),
        rate_group: record.rate_group,
    })
}

/// Convert a RateRecord to a RateEntry
///
/// The annual rate is normalized to 2 decimal places and must not be
/// negative; zero is a valid rate that prices a category at no interest.
pub fn convert_rate_record(record: RateRecord) -> Result<RateEntry, String> {
    if record.rate_group.trim().is_empty() {
        return Err("Rate group is required for rate entry".to_string());
    }
    let annual_rate_percent = parse_money(
        &record.annual_rate,
        &format!(
            "annual rate for group {} type {} category {}",
            record.rate_group, record.type_code, record.category
        ),
    )?;
    if annual_rate_percent < Decimal::ZERO {
        return Err(format!(
            "Annual rate must not be negative for group {} type {} category {}",
            record.rate_group, record.type_code, record.category
        ));
    }

    Ok(RateEntry::new(
        RateKey {
            rate_group: record.rate_group,
            type_code: record.type_code,
            category: record.category,
        },
        annual_rate_percent,
    ))
}

/// Write closing account states to CSV format
///
/// Writes accounts with columns: account, balance, credit_limit,
/// cycle_credit, cycle_debit. Accounts are sorted by account ID for
/// deterministic output and money renders with exactly 2 decimal places.
///
/// # Arguments
///
/// * `accounts` - Slice of account states to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Errors
///
/// Returns `LedgerError::Io` or `LedgerError::Parse` if writing fails.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), LedgerError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer.write_record(["account", "balance", "credit_limit", "cycle_credit", "cycle_debit"])?;

    // Sort accounts by ID for deterministic output
    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by_key(|account| account.account_id);

    for account in sorted_accounts {
        writer.write_record(&[
            account.account_id.to_string(),
            format!("{:.2}", account.balance),
            format!("{:.2}", account.credit_limit),
            format!("{:.2}", account.cycle_credit),
            format!("{:.2}", account.cycle_debit),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

/// Parse a money field, normalized to exactly 2 decimal places
///
/// Values with more than 2 decimal places are rejected; coarser values are
/// rescaled, so "100" and "100.0" both become 100.00.
fn parse_money(value: &str, context: &str) -> Result<Decimal, String> {
    let mut amount = Decimal::from_str(value.trim())
        .map_err(|_| format!("Invalid {}: '{}'", context, value))?;
    if amount.scale() > 2 {
        return Err(format!(
            "Invalid {}: '{}' has more than two decimal places",
            context, value
        ));
    }
    amount.rescale(2);
    Ok(amount)
}

/// Parse an optional money field, treating absent or blank as zero
fn parse_optional_money(value: Option<&str>, context: &str) -> Result<Decimal, String> {
    match value {
        Some(text) if !text.trim().is_empty() => parse_money(text, context),
        _ => Ok(Decimal::new(0, 2)),
    }
}
