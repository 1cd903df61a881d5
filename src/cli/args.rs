use crate::strategy::PostingConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Post card transactions against a seeded account ledger
#[derive(Parser, Debug)]
#[command(name = "card-ledger")]
#[command(about = "Post card transactions against a seeded account ledger", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing operation rows
    #[arg(value_name = "OPERATIONS", help = "Path to the operations CSV file")]
    pub operations_file: PathBuf,

    /// Account seed file the run starts from
    #[arg(
        long = "accounts",
        value_name = "ACCOUNTS",
        help = "Path to the account seed CSV file"
    )]
    pub accounts_file: PathBuf,

    /// Interest rate table, required only for --interest
    #[arg(
        long = "rates",
        value_name = "RATES",
        help = "Path to the rate table CSV file"
    )]
    pub rates_file: Option<PathBuf>,

    /// Run mode to use for applying operations
    #[arg(
        long = "mode",
        value_name = "MODE",
        default_value = "serial",
        help = "Run mode: 'serial' for in-file-order or 'partitioned' for per-account parallelism"
    )]
    pub mode: RunMode,

    /// Number of worker threads (partitioned mode only)
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Worker threads for partitioned mode (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// Accrue one month of interest after the operations are applied
    #[arg(
        long = "interest",
        help = "Run the monthly interest cycle for every account after posting"
    )]
    pub interest: bool,
}

/// Available run modes for applying the operations file
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RunMode {
    Serial,
    Partitioned,
}

impl CliArgs {
    /// Create a PostingConfig from CLI arguments
    ///
    /// Uses the worker count from the command line when one was given,
    /// falling back to the default otherwise. Invalid values are handled
    /// by `PostingConfig::new`.
    ///
    /// # Returns
    ///
    /// A `PostingConfig` with values from CLI arguments or defaults.
    pub fn to_posting_config(&self) -> PostingConfig {
        match self.workers {
            Some(workers) => PostingConfig::new(workers),
            None => PostingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // Run mode parsing tests
    #[rstest]
    #[case::default_mode(&["program", "--accounts", "accounts.csv", "ops.csv"], RunMode::Serial)]
    #[case::explicit_serial(&["program", "--accounts", "accounts.csv", "--mode", "serial", "ops.csv"], RunMode::Serial)]
    #[case::explicit_partitioned(&["program", "--accounts", "accounts.csv", "--mode", "partitioned", "ops.csv"], RunMode::Partitioned)]
    fn test_mode_parsing(#[case] args: &[&str], #[case] expected: RunMode) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        match (parsed.mode, expected) {
            (RunMode::Serial, RunMode::Serial) => (),
            (RunMode::Partitioned, RunMode::Partitioned) => (),
            _ => panic!("Expected {:?}, got {:?}", expected, parsed.mode),
        }
    }

    // Individual option tests
    #[rstest]
    #[case::workers(&["program", "--accounts", "accounts.csv", "--workers", "4", "ops.csv"], Some(4), false)]
    #[case::interest(&["program", "--accounts", "accounts.csv", "--interest", "ops.csv"], None, true)]
    #[case::no_options(&["program", "--accounts", "accounts.csv", "ops.csv"], None, false)]
    #[case::all_options(
        &["program", "--accounts", "accounts.csv", "--rates", "rates.csv", "--mode", "partitioned", "--workers", "4", "--interest", "ops.csv"],
        Some(4),
        true
    )]
    fn test_options(#[case] args: &[&str], #[case] workers: Option<usize>, #[case] interest: bool) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.workers, workers);
        assert_eq!(parsed.interest, interest);
    }

    #[test]
    fn test_rates_file_is_optional() {
        let parsed =
            CliArgs::try_parse_from(["program", "--accounts", "accounts.csv", "ops.csv"]).unwrap();
        assert_eq!(parsed.rates_file, None);

        let parsed = CliArgs::try_parse_from([
            "program",
            "--accounts",
            "accounts.csv",
            "--rates",
            "rates.csv",
            "ops.csv",
        ])
        .unwrap();
        assert_eq!(parsed.rates_file, Some(PathBuf::from("rates.csv")));
    }

    // PostingConfig conversion tests
    #[rstest]
    #[case::default_workers(&["program", "--accounts", "accounts.csv", "ops.csv"], num_cpus::get())]
    #[case::custom_workers(&["program", "--accounts", "accounts.csv", "--workers", "4", "ops.csv"], 4)]
    #[case::zero_workers_fallback(&["program", "--accounts", "accounts.csv", "--workers", "0", "ops.csv"], num_cpus::get())]
    fn test_posting_config_conversion(#[case] args: &[&str], #[case] expected_workers: usize) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_posting_config();

        assert_eq!(config.workers, expected_workers);
    }

    // Error handling tests
    #[rstest]
    #[case::missing_operations(&["program", "--accounts", "accounts.csv"])]
    #[case::missing_accounts(&["program", "ops.csv"])]
    #[case::invalid_mode(&["program", "--accounts", "accounts.csv", "--mode", "invalid", "ops.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
