//! CLI command implementations.

pub mod columns;
pub mod filter;
pub mod join;
pub mod query;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use colored::Colorize;
use sift::{Dataset, FilterConfig, FilterIssue, FilterMetadata, Parser, SourceMetadata};

type CommandResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Load the filter configuration, or the defaults when no file is given.
pub fn load_config(path: Option<PathBuf>) -> CommandResult<FilterConfig> {
    match path {
        Some(p) => Ok(FilterConfig::load(&p)?),
        None => Ok(FilterConfig::default()),
    }
}

/// Parse a data file.
pub fn load_dataset(path: &Path) -> CommandResult<(Dataset, SourceMetadata)> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }
    Ok(Parser::new().parse_file(path)?)
}

/// Write a dataset to `output`, or stdout. `.tsv` outputs are tab separated.
pub fn write_dataset(dataset: &Dataset, output: Option<&Path>) -> CommandResult<()> {
    match output {
        Some(path) => {
            let delimiter = if path.extension().is_some_and(|e| e == "tsv") {
                b'\t'
            } else {
                b','
            };
            let file = File::create(path)?;
            dataset.write_csv(BufWriter::new(file), delimiter)?;
            eprintln!(
                "{} {} rows to {}",
                "Wrote".green().bold(),
                dataset.row_count(),
                path.display()
            );
        }
        None => dataset.write_csv(io::stdout().lock(), b',')?,
    }
    Ok(())
}

/// Print issues to stderr, one per line.
pub fn print_issues(issues: &[FilterIssue]) {
    for issue in issues {
        eprintln!("{} {}", "warning:".yellow().bold(), issue);
    }
}

/// Print the filter summary to stderr.
pub fn print_metadata(metadata: &FilterMetadata) {
    if !metadata.active {
        eprintln!("{}", "No filter applied".dimmed());
        return;
    }
    for description in &metadata.descriptions {
        eprintln!("  {} {}", "•".cyan(), description);
    }
    eprintln!(
        "{} {} of {} rows ({:.1}% reduction)",
        "Kept".cyan().bold(),
        metadata.filtered_count.to_string().white().bold(),
        metadata.original_count,
        metadata.reduction_pct()
    );
}

/// Split "column=rest" arguments.
pub fn split_assignment(arg: &str) -> CommandResult<(&str, &str)> {
    arg.split_once('=')
        .map(|(col, rest)| (col.trim(), rest.trim()))
        .filter(|(col, _)| !col.is_empty())
        .ok_or_else(|| format!("Expected COLUMN=VALUE, got '{}'", arg).into())
}
