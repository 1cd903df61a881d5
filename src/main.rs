//! Card Ledger CLI
//!
//! Command-line interface for posting card transactions from CSV files
//! against a seeded account ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --accounts accounts.csv operations.csv > closing.csv
//! cargo run -- --accounts accounts.csv --mode partitioned --workers 8 operations.csv > closing.csv
//! cargo run -- --accounts accounts.csv --rates rates.csv --interest operations.csv > closing.csv
//! ```
//!
//! The program seeds the ledger from the accounts file (and the rate table,
//! when given), applies every operation row through the posting rules,
//! optionally accrues one month of interest, and writes the closing account
//! states to stdout.
//!
//! # Run Modes
//!
//! - **serial**: Apply rows strictly in file order, single-threaded (default)
//! - **partitioned**: Apply rows in parallel across accounts, preserving
//!   per-account file order
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, unreadable seed or operations file, etc.)

use card_ledger::cli::{self, CliArgs, RunMode};
use card_ledger::core::{LedgerEngine, MemoryStore};
use card_ledger::io::{read_accounts, read_rates, write_accounts_csv};
use card_ledger::strategy;
use card_ledger::types::LedgerError;
use chrono::Utc;
use log::{info, warn};
use std::process;

fn main() {
    env_logger::init();

    let args = cli::parse_args();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), LedgerError> {
    let store = MemoryStore::new();

    for account in read_accounts(&args.accounts_file)? {
        store.insert_account(account);
    }
    if let Some(rates_file) = &args.rates_file {
        for rate in read_rates(rates_file)? {
            store.insert_rate(rate);
        }
    }

    // Create the appropriate posting strategy based on CLI arguments
    let strategy = {
        let config = if matches!(args.mode, RunMode::Partitioned) {
            Some(args.to_posting_config())
        } else {
            None
        };
        strategy::create_strategy(args.mode, config)
    };

    let processed_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let summary = strategy.run(&store, &args.operations_file, &processed_at)?;
    info!(
        "applied {} of {} rows ({} rejected, {} failed)",
        summary.applied,
        summary.total(),
        summary.rejected,
        summary.failed
    );

    if args.interest {
        let engine = LedgerEngine::new(&store);
        let mut account_ids = store.account_ids();
        account_ids.sort_unstable();

        // An accrual fault on one account does not stop the cycle for
        // the rest
        for account_id in account_ids {
            match engine.run_monthly_interest(account_id) {
                Ok(interest_run) => info!(
                    "account {} accrued {} interest",
                    account_id, interest_run.total
                ),
                Err(e) => warn!("interest accrual failed for account {}: {}", account_id, e),
            }
        }
    }

    // Closing account states go to stdout
    let mut output = std::io::stdout();
    write_accounts_csv(&store.accounts(), &mut output)?;

    Ok(())
}
