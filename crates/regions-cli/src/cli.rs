//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

/// Snapshot used when `--store` is not given.
pub const DEFAULT_STORE: &str = "regions-store.json";

#[derive(Parser)]
#[command(
    name = "regions",
    version,
    about = "Identify regions and normalize regional statistical tables",
    long_about = "Identify regions by name or code and normalize agency tables into \
                  region-keyed, time-indexed series.\n\n\
                  Reference data (ISO 3166-1, USPS abbreviations, aliases) lives in a \
                  JSON store snapshot built with the `bootstrap` command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Reference store snapshot.
    #[arg(long = "store", value_name = "PATH", default_value = DEFAULT_STORE, global = true)]
    pub store: PathBuf,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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

    /// Prefix pretty and compact log lines with timestamps.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Omit span close events from json logs.
    #[arg(long = "no-log-spans", global = true)]
    pub no_log_spans: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load reference tables into the store.
    Bootstrap(BootstrapArgs),

    /// Resolve names or codes to canonical regions.
    Identify(IdentifyArgs),

    /// Show how a table's columns map onto series roles.
    Columns(ColumnsArgs),

    /// Normalize a table into region records.
    Import(ImportArgs),

    /// Add an ISO 3166-1 alpha-3 `regionCode` column to a table.
    Format(FormatArgs),
}

#[derive(Args)]
pub struct BootstrapArgs {
    /// ISO 3166-1 table (tab or comma separated).
    #[arg(long = "iso", value_name = "PATH")]
    pub iso: Option<PathBuf>,

    /// USPS state and territory abbreviations.
    #[arg(long = "usps", value_name = "PATH")]
    pub usps: Option<PathBuf>,

    /// Alternate region names (`regionCode` alpha-3, `regionName` columns).
    #[arg(long = "aliases", value_name = "PATH")]
    pub aliases: Option<PathBuf>,

    /// Skip installing the standard scale vocabulary.
    #[arg(long = "no-scales")]
    pub no_scales: bool,
}

#[derive(Args)]
pub struct IdentifyArgs {
    /// Names or codes to resolve.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,

    /// Namespace to search first (e.g. "United States Postal Abbreviations").
    #[arg(long = "namespace", value_name = "NAME")]
    pub namespace: Option<String>,

    /// Fuzzy match threshold between 0 and 100.
    #[arg(long = "threshold", value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Also list the closest aliases for each input.
    #[arg(long = "candidates", value_name = "N", default_value_t = 0)]
    pub candidates: usize,

    /// Print results as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ColumnsArgs {
    /// Delimited text table (.csv, .tsv).
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Import configuration (.json or .toml).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Delimited text table (.csv, .tsv).
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Import configuration (.json or .toml).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the dataset JSON here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Resolve region codes through the reference store.
    #[arg(long = "resolve")]
    pub resolve: bool,

    /// Fail on regions the store cannot resolve (implies --resolve).
    #[arg(long = "strict")]
    pub strict: bool,

    /// Namespace of the table's region codes.
    #[arg(long = "namespace", value_name = "NAME")]
    pub namespace: Option<String>,

    /// Add unknown regions and their codes to the store under --namespace.
    #[arg(long = "register", requires = "namespace")]
    pub register: bool,

    /// Emit dates instead of years as time indices.
    #[arg(long = "json-compatible")]
    pub json_compatible: bool,

    /// Hide the progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Pretty-print the dataset JSON.
    #[arg(long = "pretty")]
    pub pretty: bool,
}

#[derive(Args)]
pub struct FormatArgs {
    /// Delimited text table (.csv, .tsv).
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Output file or directory [default: TABLE with an `.edited.tsv` extension].
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Column holding the names or codes to convert.
    #[arg(long = "column", short = 'c', value_name = "NAME", default_value = "countryCode")]
    pub column: String,

    /// Namespace of the column's codes.
    #[arg(long = "namespace", short = 'n', value_name = "NAME")]
    pub namespace: Option<String>,

    /// Fuzzy match threshold between 0 and 100; 0 matches codes and names exactly.
    #[arg(long = "fuzzy", short = 'f', value_name = "SCORE", default_value_t = 0.0)]
    pub fuzzy: f64,
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
