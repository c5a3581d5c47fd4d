//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sift: filter, query and join tabular data files
#[derive(Parser)]
#[command(name = "sift")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Filter configuration file (JSON)
    #[arg(long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify columns and show the filter choices each one offers
    Columns {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply per-column filters in order
    Filter {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Numeric range, e.g. "age=25:40"
        #[arg(long = "range", value_name = "COL=MIN:MAX")]
        ranges: Vec<String>,

        /// Categorical values, e.g. "city=NY,LA"
        #[arg(long = "values", value_name = "COL=V1,V2")]
        values: Vec<String>,

        /// Substring search on a high-cardinality column, e.g. "name=al"
        #[arg(long = "search", value_name = "COL=TERM")]
        searches: Vec<String>,

        /// Date range, e.g. "joined=2024-01-01:2024-06-30"
        #[arg(long = "dates", value_name = "COL=START:END")]
        dates: Vec<String>,

        /// Output path for the filtered data (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the filter summary as JSON instead of writing data
        #[arg(long)]
        json: bool,
    },

    /// Run a multi-condition query
    Query {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Conditions and connectives, e.g. "age > 30" and "city == NY"
        #[arg(value_name = "TERMS", required = true, num_args = 1..)]
        terms: Vec<String>,

        /// Only show the generated query
        #[arg(long)]
        show: bool,

        /// Output path for the filtered data (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the filter summary as JSON instead of writing data
        #[arg(long)]
        json: bool,
    },

    /// Join two data files on key columns
    Join {
        /// Left data file
        #[arg(value_name = "LEFT")]
        left: PathBuf,

        /// Right data file
        #[arg(value_name = "RIGHT")]
        right: PathBuf,

        /// Key column in the left file
        #[arg(long)]
        left_key: String,

        /// Key column in the right file
        #[arg(long)]
        right_key: String,

        /// Join type: inner, left, right or outer
        #[arg(long, default_value = "inner")]
        how: String,

        /// Convert mismatched key columns to a common type
        #[arg(long)]
        auto_fix: bool,

        /// Output path for the joined data (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the join report as JSON instead of writing data
        #[arg(long)]
        json: bool,
    },
}
