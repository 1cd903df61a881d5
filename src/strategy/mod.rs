//! Posting strategy module for batch ledger runs
//!
//! This module defines the Strategy pattern for complete batch posting
//! pipelines, encompassing CSV reading, per-operation dispatch through the
//! ledger engine, and row-level outcome accounting. This allows different
//! scheduling implementations (serial streaming, account-partitioned
//! workers) to be selected at runtime while sharing the same per-row
//! semantics.

use crate::cli::RunMode;
use crate::core::{LedgerEngine, MemoryStore};
use crate::io::LedgerOp;
use crate::types::LedgerError;
use log::warn;
use std::path::Path;

pub mod partitioned;
pub mod serial;

pub use partitioned::{PartitionedPostingStrategy, PostingConfig};
pub use serial::SerialPostingStrategy;

/// Row-level outcome counts for one batch run
///
/// A run fails outright only when the operations file itself cannot be
/// read. Everything that goes wrong at the row level is counted here and
/// the run continues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows that validated and were applied to the ledger
    pub applied: usize,

    /// Rows refused by a business rule, with the ledger left untouched
    pub rejected: usize,

    /// Rows that failed to parse or hit a fault
    pub failed: usize,
}

impl RunSummary {
    /// Total rows the run saw
    pub fn total(&self) -> usize {
        self.applied + self.rejected + self.failed
    }

    /// Fold another summary into this one
    pub fn merge(&mut self, other: RunSummary) {
        self.applied += other.applied;
        self.rejected += other.rejected;
        self.failed += other.failed;
    }
}

/// Posting strategy trait for complete batch runs
///
/// This trait defines the interface for different batch scheduling
/// implementations. Each strategy must read operations from a CSV file and
/// dispatch every row through the ledger engine against the given store.
/// The store is seeded by the caller before the run and inspected by the
/// caller afterwards; strategies only move balances.
pub trait PostingStrategy: Send + Sync {
    /// Run every operation in the input file against the store
    ///
    /// # Arguments
    ///
    /// * `store` - The seeded ledger store the run posts against
    /// * `operations_path` - Path to the operations CSV file
    /// * `processed_at` - Processing timestamp stamped onto every post
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` with per-row outcome counts if the file could be
    ///   read end to end
    /// * `Err(LedgerError)` if a fatal error occurred (file not found,
    ///   I/O error)
    ///
    /// # Errors
    ///
    /// Returns an error only for run-level failures such as an unreadable
    /// input file. Individual rows that fail to parse, are refused by a
    /// business rule, or hit a fault are logged, counted in the summary,
    /// and skipped; the run continues with the next row.
    fn run(
        &self,
        store: &MemoryStore,
        operations_path: &Path,
        processed_at: &str,
    ) -> Result<RunSummary, LedgerError>;
}

/// Dispatch one operation through the engine and record its outcome
///
/// Business rejections and row faults are logged with their reason code
/// and counted, never propagated; a batch keeps going past them.
pub(crate) fn apply_operation(
    engine: &LedgerEngine<&MemoryStore>,
    op: LedgerOp,
    summary: &mut RunSummary,
) {
    let outcome = match &op {
        LedgerOp::Post(request) => engine.post_transaction(request).map(|_| ()),
        LedgerOp::PayBill { account_id } => engine.pay_bill_in_full(*account_id).map(|_| ()),
    };

    match outcome {
        Ok(()) => summary.applied += 1,
        Err(e) if e.is_rejection() => {
            warn!("operation refused [{}]: {}", e.code(), e);
            summary.rejected += 1;
        }
        Err(e) => {
            warn!("operation failed [{}]: {}", e.code(), e);
            summary.failed += 1;
        }
    }
}

/// Create a posting strategy based on the selected run mode
///
/// This factory function implements the Strategy pattern by selecting and
/// instantiating the appropriate posting strategy implementation at runtime
/// based on the provided run mode and optional configuration.
///
/// # Arguments
///
/// * `mode` - The run mode to create (Serial or Partitioned)
/// * `config` - Optional worker configuration (ignored for serial)
///
/// # Returns
///
/// A boxed trait object implementing the PostingStrategy trait
pub fn create_strategy(mode: RunMode, config: Option<PostingConfig>) -> Box<dyn PostingStrategy> {
    match mode {
        RunMode::Serial => Box::new(SerialPostingStrategy),
        RunMode::Partitioned => {
            let config = config.unwrap_or_default();
            Box::new(PartitionedPostingStrategy::new(config))
        }
    }
}
