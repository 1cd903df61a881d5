//! Partitioned posting strategy
//!
//! This module provides a multi-threaded implementation of the
//! PostingStrategy trait. The whole operations file is read up front, rows
//! are grouped by account in file order, and the groups are dealt
//! round-robin across a fixed set of worker threads over the shared store.
//!
//! # Ordering
//!
//! All rows for one account land in one group, and each group runs on
//! exactly one worker, so per-account ordering matches the file even
//! though different accounts proceed in parallel. No ordering is defined
//! across accounts. When duplicate transaction IDs appear on different
//! accounts the journal still admits exactly one of them, but which row
//! survives depends on worker timing; serial mode resolves the same input
//! by file order.
//!
//! # Thread Safety
//!
//! Workers are scoped threads borrowing the caller's store. The store's
//! per-account exclusive scopes do the actual serialization; partitioning
//! exists so each worker streams its accounts without lock contention.

use crate::core::{LedgerEngine, MemoryStore};
use crate::io::reader::OperationReader;
use crate::io::LedgerOp;
use crate::strategy::{apply_operation, PostingStrategy, RunSummary};
use crate::types::{AccountId, LedgerError};
use log::warn;
use std::collections::HashMap;
use std::path::Path;
use std::thread;

/// Configuration for partitioned posting
///
/// Controls the number of worker threads the run spreads account groups
/// across.
#[derive(Clone, Debug)]
pub struct PostingConfig {
    /// Number of worker threads
    pub workers: usize,
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
        }
    }
}

impl PostingConfig {
    /// Create a new PostingConfig with a custom worker count
    ///
    /// A zero worker count is invalid and falls back to the default of one
    /// worker per CPU core, with a warning.
    pub fn new(workers: usize) -> Self {
        if workers == 0 {
            let default = Self::default();
            warn!(
                "invalid worker count ({}), using default ({})",
                workers, default.workers
            );
            return default;
        }
        Self { workers }
    }
}

/// Partitioned posting strategy
///
/// Implements the PostingStrategy trait using account-partitioned worker
/// threads. Operations for different accounts are applied concurrently
/// while operations for the same account keep their file order.
///
/// # Configuration
///
/// The strategy accepts a PostingConfig with:
/// - `workers`: Number of worker threads (default: CPU cores)
#[derive(Debug, Clone)]
pub struct PartitionedPostingStrategy {
    /// Worker configuration
    config: PostingConfig,
}

impl PartitionedPostingStrategy {
    /// Create a new PartitionedPostingStrategy with the given configuration
    pub fn new(config: PostingConfig) -> Self {
        Self { config }
    }

    /// Group operations by account, preserving file order within each group
    ///
    /// # Guarantees
    ///
    /// - Each operation lands in exactly one group
    /// - No operations are lost or duplicated
    /// - Operations for each account keep their original order
    fn partition_by_account(operations: Vec<LedgerOp>) -> HashMap<AccountId, Vec<LedgerOp>> {
        let mut groups: HashMap<AccountId, Vec<LedgerOp>> = HashMap::new();

        for op in operations {
            groups.entry(op.account_id()).or_default().push(op);
        }

        groups
    }

    /// Apply one worker's shard of operations sequentially
    fn drain_shard(store: &MemoryStore, shard: Vec<LedgerOp>) -> RunSummary {
        let engine = LedgerEngine::new(store);
        let mut summary = RunSummary::default();

        for op in shard {
            apply_operation(&engine, op, &mut summary);
        }

        summary
    }
}

impl PostingStrategy for PartitionedPostingStrategy {
    /// Run every operation in the input file against the store, in parallel
    /// across accounts
    ///
    /// This method implements the complete partitioned pipeline:
    /// 1. Streams the whole file, collecting operations and counting rows
    ///    that fail to parse
    /// 2. Partitions the operations by account, preserving file order
    ///    within each account
    /// 3. Deals the account groups round-robin across the configured
    ///    number of worker threads
    /// 4. Joins the workers and merges their per-row outcome counts
    ///
    /// # Arguments
    ///
    /// * `store` - The seeded ledger store the run posts against
    /// * `operations_path` - Path to the operations CSV file
    /// * `processed_at` - Processing timestamp stamped onto every post
    ///
    /// # Errors
    ///
    /// Fatal errors (file not found, I/O errors, a panicked worker) are
    /// returned. Row-level parse failures, business rejections, and faults
    /// are logged, counted, and skipped.
    fn run(
        &self,
        store: &MemoryStore,
        operations_path: &Path,
        processed_at: &str,
    ) -> Result<RunSummary, LedgerError> {
        let reader = OperationReader::new(operations_path, processed_at)?;

        let mut summary = RunSummary::default();
        let mut operations = Vec::new();
        for result in reader {
            match result {
                Ok(op) => operations.push(op),
                Err(e) => {
                    warn!("skipped row [{}]: {}", e.code(), e);
                    summary.failed += 1;
                }
            }
        }

        let groups = Self::partition_by_account(operations);
        if groups.is_empty() {
            return Ok(summary);
        }

        // One spawn per worker, not per account, so a file touching
        // thousands of accounts still uses a bounded number of threads.
        let worker_count = self.config.workers.clamp(1, groups.len());
        let mut shards: Vec<Vec<LedgerOp>> = vec![Vec::new(); worker_count];
        for (index, (_, group)) in groups.into_iter().enumerate() {
            shards[index % worker_count].extend(group);
        }

        let worker_summaries = thread::scope(|scope| {
            let handles: Vec<_> = shards
                .into_iter()
                .map(|shard| scope.spawn(move || Self::drain_shard(store, shard)))
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .map_err(|_| LedgerError::storage("posting worker panicked"))
                })
                .collect::<Result<Vec<_>, LedgerError>>()
        })?;

        for worker in worker_summaries {
            summary.merge(worker);
        }

        Ok(summary)
    }
}
