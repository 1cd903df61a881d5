//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, output serialization)
//! - `reader` - Streaming operation reader and fail-fast seed loaders

pub mod csv_format;
pub mod reader;

pub use csv_format::{
    convert_account_record, convert_operation_record, convert_rate_record, write_accounts_csv,
    LedgerOp,
};
pub use reader::{read_accounts, read_rates, OperationReader};
