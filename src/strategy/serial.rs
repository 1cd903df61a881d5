//! Serial posting strategy
//!
//! This module provides a synchronous, single-threaded implementation of
//! the PostingStrategy trait. It orchestrates a batch run by coordinating
//! between the OperationReader (for CSV input) and the LedgerEngine (for
//! the posting rules).
//!
//! # Design
//!
//! The SerialPostingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `OperationReader` (iterator interface)
//! - Validation and application to `LedgerEngine` (business logic)
//!
//! # Memory Efficiency
//!
//! This strategy maintains constant memory usage: operations are streamed
//! one at a time and never collected, so memory is bounded by the seeded
//! account and rate state, not by the size of the operations file.
//!
//! # Ordering
//!
//! Rows are applied strictly in file order, for every account. This is the
//! mode that gives a deterministic outcome when duplicate transaction IDs
//! appear across different accounts: the first row in the file wins.

use crate::core::{LedgerEngine, MemoryStore};
use crate::io::reader::OperationReader;
use crate::strategy::{apply_operation, PostingStrategy, RunSummary};
use crate::types::LedgerError;
use log::warn;
use std::path::Path;

/// Serial posting strategy
///
/// Implements the PostingStrategy trait using single-threaded, streaming
/// processing. Orchestrates the flow from CSV reading through validation
/// and application, one row at a time.
///
/// # Examples
///
/// ```no_run
/// use card_ledger::core::MemoryStore;
/// use card_ledger::strategy::{PostingStrategy, SerialPostingStrategy};
/// use std::path::Path;
///
/// let store = MemoryStore::new();
/// let strategy = SerialPostingStrategy;
///
/// let summary = strategy
///     .run(&store, Path::new("operations.csv"), "2026-03-01 10:00:00")
///     .expect("run failed");
/// println!("applied {} of {} rows", summary.applied, summary.total());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SerialPostingStrategy;

impl PostingStrategy for SerialPostingStrategy {
    /// Run every operation in the input file against the store, in order
    ///
    /// This method orchestrates the complete serial pipeline:
    /// 1. Creates an OperationReader to stream rows from the CSV file
    /// 2. Creates a LedgerEngine over the store
    /// 3. Iterates through rows, dispatching each through the engine
    /// 4. Counts each row's outcome in the returned summary
    ///
    /// # Arguments
    ///
    /// * `store` - The seeded ledger store the run posts against
    /// * `operations_path` - Path to the operations CSV file
    /// * `processed_at` - Processing timestamp stamped onto every post
    ///
    /// # Errors
    ///
    /// Fatal errors (file not found, I/O errors) are returned immediately.
    /// Row-level parse failures, business rejections, and faults are
    /// logged, counted, and skipped.
    fn run(
        &self,
        store: &MemoryStore,
        operations_path: &Path,
        processed_at: &str,
    ) -> Result<RunSummary, LedgerError> {
        let engine = LedgerEngine::new(store);
        let reader = OperationReader::new(operations_path, processed_at)?;

        let mut summary = RunSummary::default();
        for result in reader {
            match result {
                Ok(op) => apply_operation(&engine, op, &mut summary),
                Err(e) => {
                    warn!("skipped row [{}]: {}", e.code(), e);
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LedgerStore;
    use crate::types::{Account, LedgerError};
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const STAMP: &str = "2026-03-01 10:00:00";

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn seeded_store(limit_cents: i64) -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_account(Account::new(
            1,
            Decimal::new(limit_cents, 2),
            "2030-01-31",
            "STANDARD",
        ));
        store.insert_account(Account::new(
            2,
            Decimal::new(limit_cents, 2),
            "2030-01-31",
            "STANDARD",
        ));
        store
    }

    #[test]
    fn test_serial_strategy_applies_valid_rows() {
        let csv_content = "op,tx,account,type,category,amount,originated\n\
                          post,1,1,10,100,100.00,2026-02-27 09:15:00\n\
                          post,2,2,10,100,50.00,2026-02-27 09:16:00\n";
        let file = create_temp_csv(csv_content);
        let store = seeded_store(500000);

        let strategy = SerialPostingStrategy;
        let summary = strategy.run(&store, file.path(), STAMP).unwrap();

        assert_eq!(summary.applied, 2);
        assert_eq!(summary.rejected, 0);
        assert_eq!(summary.failed, 0);
        assert_eq!(store.account(1).unwrap().balance, Decimal::new(10000, 2));
        assert_eq!(store.account(2).unwrap().balance, Decimal::new(5000, 2));
    }

    #[test]
    fn test_serial_strategy_handles_missing_file() {
        let store = seeded_store(500000);
        let strategy = SerialPostingStrategy;

        let result = strategy.run(&store, Path::new("nonexistent.csv"), STAMP);
        assert!(matches!(result, Err(LedgerError::Io { .. })));
    }

    #[test]
    fn test_serial_strategy_continues_past_bad_row() {
        let csv_content = "op,tx,account,type,category,amount,originated\n\
                          post,1,1,10,100,100.00,2026-02-27 09:15:00\n\
                          post,2,1,10,100,not-money,2026-02-27 09:16:00\n\
                          post,3,2,10,100,25.00,2026-02-27 09:17:00\n";
        let file = create_temp_csv(csv_content);
        let store = seeded_store(500000);

        let strategy = SerialPostingStrategy;
        let summary = strategy.run(&store, file.path(), STAMP).unwrap();

        assert_eq!(summary.applied, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(store.account(1).unwrap().balance, Decimal::new(10000, 2));
        assert_eq!(store.account(2).unwrap().balance, Decimal::new(2500, 2));
    }

    #[test]
    fn test_serial_strategy_counts_rejections() {
        // Account limit is 100.00, so a 150.00 post is over limit
        let csv_content = "op,tx,account,type,category,amount,originated\n\
                          post,1,1,10,100,150.00,2026-02-27 09:15:00\n";
        let file = create_temp_csv(csv_content);
        let store = seeded_store(10000);

        let strategy = SerialPostingStrategy;
        let summary = strategy.run(&store, file.path(), STAMP).unwrap();

        assert_eq!(summary.applied, 0);
        assert_eq!(summary.rejected, 1);
        assert_eq!(store.account(1).unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_serial_strategy_runs_billpay_in_file_order() {
        let csv_content = "op,tx,account,type,category,amount,originated\n\
                          post,1,1,10,100,100.00,2026-02-27 09:15:00\n\
                          post,2,1,10,100,200.00,2026-02-27 09:16:00\n\
                          billpay,,1,,,,\n";
        let file = create_temp_csv(csv_content);
        let store = seeded_store(500000);

        let strategy = SerialPostingStrategy;
        let summary = strategy.run(&store, file.path(), STAMP).unwrap();

        assert_eq!(summary.applied, 3);
        let account = store.account(1).unwrap();
        assert_eq!(account.balance, Decimal::ZERO);
        assert_eq!(account.cycle_credit, Decimal::new(30000, 2));
    }

    #[test]
    fn test_serial_strategy_rejects_billpay_with_nothing_owed() {
        let csv_content = "op,tx,account,type,category,amount,originated\n\
                          billpay,,1,,,,\n";
        let file = create_temp_csv(csv_content);
        let store = seeded_store(500000);

        let strategy = SerialPostingStrategy;
        let summary = strategy.run(&store, file.path(), STAMP).unwrap();

        assert_eq!(summary.applied, 0);
        assert_eq!(summary.rejected, 1);
    }

    #[test]
    fn test_serial_strategy_counts_unknown_account_as_failure() {
        let csv_content = "op,tx,account,type,category,amount,originated\n\
                          post,1,99,10,100,100.00,2026-02-27 09:15:00\n";
        let file = create_temp_csv(csv_content);
        let store = seeded_store(500000);

        let strategy = SerialPostingStrategy;
        let summary = strategy.run(&store, file.path(), STAMP).unwrap();

        assert_eq!(summary.applied, 0);
        assert_eq!(summary.rejected, 0);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_serial_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SerialPostingStrategy>();
    }
}
