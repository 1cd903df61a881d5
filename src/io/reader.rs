//! CSV readers for batch input files
//!
//! Provides a streaming iterator over operation rows plus fail-fast loaders
//! for the account seed and rate table files. CSV format concerns live in
//! the csv_format module; this module owns files, buffering, and line
//! numbers.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from the
//!   constructors
//! - Individual operation rows that fail to parse are yielded as Err
//!   variants so a batch run can log them and continue
//! - Seed files are different: an invalid account or rate row aborts the
//!   load, because running against a partial seed would silently change
//!   results
//!
//! # Memory Efficiency
//!
//! The operation reader processes rows one at a time and never loads the
//! whole file, so memory usage stays constant regardless of input size.

use crate::io::csv_format::{
    convert_account_record, convert_operation_record, convert_rate_record, AccountRecord, LedgerOp,
    OperationRecord, RateRecord,
};
use crate::types::{Account, LedgerError, RateEntry};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Streaming reader over the operations CSV
///
/// Yields one `Result<LedgerOp, LedgerError>` per row. The processing
/// timestamp supplied at construction is stamped onto every post the
/// reader produces.
///
/// # Examples
///
/// ```no_run
/// use card_ledger::io::reader::OperationReader;
/// use std::path::Path;
///
/// let reader = OperationReader::new(Path::new("transactions.csv"), "2026-03-01 10:00:00").unwrap();
/// for result in reader {
///     match result {
///         Ok(op) => println!("Processing operation: {:?}", op),
///         Err(e) => eprintln!("Error: {}", e),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct OperationReader {
    reader: csv::Reader<File>,
    line_num: u64,
    processed_at: String,
}

impl OperationReader {
    /// Create a new OperationReader from a file path
    ///
    /// Opens the CSV file and prepares it for streaming iteration. The
    /// reader trims whitespace from all fields and tolerates rows with
    /// missing trailing fields, which is how billpay rows arrive.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the operations CSV file
    /// * `processed_at` - Processing timestamp stamped onto posts
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Io` if the file could not be opened.
    pub fn new(path: &Path, processed_at: &str) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| LedgerError::Io {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
            processed_at: processed_at.to_string(),
        })
    }
}

impl Iterator for OperationReader {
    type Item = Result<LedgerOp, LedgerError>;

    /// Get the next operation from the CSV file
    ///
    /// # Returns
    ///
    /// * `Some(Ok(LedgerOp))` - Successfully parsed operation
    /// * `Some(Err(LedgerError::Parse))` - Parse or conversion error with
    ///   the offending line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<OperationRecord>();

        match deserializer.next()? {
            Ok(record) => {
                self.line_num += 1;
                // The header occupies line 1, so data rows start at 2
                Some(
                    convert_operation_record(record, &self.processed_at).map_err(|message| {
                        LedgerError::Parse {
                            line: Some(self.line_num + 1),
                            message,
                        }
                    }),
                )
            }
            Err(e) => {
                self.line_num += 1;
                Some(Err(LedgerError::Parse {
                    line: Some(self.line_num + 1),
                    message: e.to_string(),
                }))
            }
        }
    }
}

/// Load the account seed file
///
/// Every row must convert cleanly; the first invalid row aborts the load
/// with its line number.
///
/// # Errors
///
/// Returns `LedgerError::Io` if the file cannot be opened, or
/// `LedgerError::Parse` naming the offending line.
pub fn read_accounts(path: &Path) -> Result<Vec<Account>, LedgerError> {
    let file = File::open(path).map_err(|e| LedgerError::Io {
        message: format!("Failed to open file '{}': {}", path.display(), e),
    })?;
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(file);

    let mut accounts = Vec::new();
    for (index, row) in reader.deserialize::<AccountRecord>().enumerate() {
        let line = (index + 2) as u64;
        let record = row.map_err(|e| LedgerError::Parse {
            line: Some(line),
            message: e.to_string(),
        })?;
        let account = convert_account_record(record).map_err(|message| LedgerError::Parse {
            line: Some(line),
            message,
        })?;
        accounts.push(account);
    }

    Ok(accounts)
}

/// Load the rate table file
///
/// Same fail-fast behavior as `read_accounts`: a malformed rate row aborts
/// the load rather than pricing categories from a partial table.
///
/// # Errors
///
/// Returns `LedgerError::Io` if the file cannot be opened, or
/// `LedgerError::Parse` naming the offending line.
pub fn read_rates(path: &Path) -> Result<Vec<RateEntry>, LedgerError> {
    let file = File::open(path).map_err(|e| LedgerError::Io {
        message: format!("Failed to open file '{}': {}", path.display(), e),
    })?;
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(file);

    let mut rates = Vec::new();
    for (index, row) in reader.deserialize::<RateRecord>().enumerate() {
        let line = (index + 2) as u64;
        let record = row.map_err(|e| LedgerError::Parse {
            line: Some(line),
            message: e.to_string(),
        })?;
        let entry = convert_rate_record(record).map_err(|message| LedgerError::Parse {
            line: Some(line),
            message,
        })?;
        rates.push(entry);
    }

    Ok(rates)
}
