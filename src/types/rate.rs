//! Interest rate table types
//!
//! The disclosure rate table maps (rate group, transaction type, category)
//! to an annual percentage rate. It is read-only reference data: the ledger
//! looks rates up but never writes them.

use super::transaction::{CategoryCode, TypeCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identity of one rate table entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateKey {
    /// Rate group tag, e.g. "STANDARD"
    pub rate_group: String,

    /// Transaction type code
    pub type_code: TypeCode,

    /// Transaction category code
    pub category: CategoryCode,
}

impl RateKey {
    /// Create a rate key
    pub fn new(rate_group: &str, type_code: TypeCode, category: CategoryCode) -> Self {
        RateKey {
            rate_group: rate_group.to_string(),
            type_code,
            category,
        }
    }
}

/// One disclosure rate table entry
///
/// A missing entry and an entry with a zero rate are distinct situations:
/// both yield no interest, but the engine reports them differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    /// Identity of this entry
    pub key: RateKey,

    /// Annual percentage rate, e.g. 12.00 for 12% APR
    pub annual_rate_percent: Decimal,
}

impl RateEntry {
    /// Create a rate entry
    pub fn new(key: RateKey, annual_rate_percent: Decimal) -> Self {
        RateEntry {
            key,
            annual_rate_percent,
        }
    }
}
