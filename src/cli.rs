//! CLI argument parsing for apriori-miner

use crate::mining::SupportCounting;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for mining results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

/// Shape of the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputLayout {
    /// CSV table with one (transaction id, item) pair per row
    Long,
    /// One transaction per line, items separated by commas
    Basket,
}

/// Support-counting strategy as a CLI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CountingArg {
    Scan,
    Index,
}

impl From<CountingArg> for SupportCounting {
    fn from(arg: CountingArg) -> Self {
        match arg {
            CountingArg::Scan => SupportCounting::Scan,
            CountingArg::Index => SupportCounting::Index,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "apriori-miner")]
#[command(version)]
#[command(about = "Frequent itemset and association rule mining (Apriori)", long_about = None)]
pub struct Cli {
    /// Input file with transactions
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Input layout
    #[arg(long, value_enum, default_value = "long")]
    pub layout: InputLayout,

    /// Transaction id column (long layout)
    #[arg(long = "id-column", value_name = "NAME", default_value = "transaction_id")]
    pub id_column: String,

    /// Item column (long layout)
    #[arg(long = "item-column", value_name = "NAME", default_value = "item")]
    pub item_column: String,

    /// TOML configuration file (flags below override it)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Minimum support in [0, 1]
    #[arg(short = 's', long = "min-support", value_name = "RATIO")]
    pub min_support: Option<f64>,

    /// Minimum confidence in [0, 1]
    #[arg(short = 'c', long = "min-confidence", value_name = "RATIO")]
    pub min_confidence: Option<f64>,

    /// Support-counting strategy
    #[arg(long = "support-counting", value_enum)]
    pub support_counting: Option<CountingArg>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Report frequent itemsets only, skip rule generation
    #[arg(long = "itemsets-only")]
    pub itemsets_only: bool,

    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,
}
