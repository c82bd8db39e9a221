//! CLI argument definitions for the cardio pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cardio",
    version,
    about = "De-identify cardiovascular screening data and report its quality",
    long_about = "De-identify a cardiovascular screening CSV, derive analysis features \
                  and score the result against a fixed battery of data-quality checks.\n\n\
                  Writes the featured dataset, JSON and HTML quality reports and \
                  star-schema warehouse tables."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row-level values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the pipeline over one raw CSV file.
    Run(RunArgs),

    /// Print the configured band tables.
    Bands(BandsArgs),

    /// Print the default configuration as TOML.
    DefaultConfig,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Raw screening CSV (comma or semicolon separated).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory for generated files (default: output/ beside INPUT).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML configuration file; absent keys take defaults.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Field separator (detected from the header when omitted).
    #[arg(long = "separator", value_name = "CHAR")]
    pub separator: Option<char>,

    /// How surrogate patient identifiers are produced.
    #[arg(long = "id-strategy", value_enum)]
    pub id_strategy: Option<IdStrategyArg>,

    /// Salt for content-hash identifiers.
    #[arg(long = "id-salt", value_name = "SALT")]
    pub id_salt: Option<String>,

    /// Skip the warehouse table export.
    #[arg(long = "no-warehouse")]
    pub no_warehouse: bool,

    /// Validate and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Exit with status 2 when the overall score is below this value.
    #[arg(long = "min-score", value_name = "SCORE")]
    pub min_score: Option<f64>,
}

#[derive(Parser)]
pub struct BandsArgs {
    /// TOML configuration file to read band tables from.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum IdStrategyArg {
    Sequential,
    ContentHash,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "cardio",
            "run",
            "cardio.csv",
            "--separator",
            ";",
            "--id-strategy",
            "content-hash",
            "--id-salt",
            "pepper",
            "--min-score",
            "95",
            "--no-warehouse",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.separator, Some(';'));
        assert_eq!(args.id_strategy, Some(IdStrategyArg::ContentHash));
        assert_eq!(args.id_salt.as_deref(), Some("pepper"));
        assert_eq!(args.min_score, Some(95.0));
        assert!(args.no_warehouse);
        assert!(!args.dry_run);
    }
}
