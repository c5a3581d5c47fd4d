//! Filter command - apply per-column filters.

use std::path::PathBuf;

use sift::dataset::parse_date;
use sift::{DateRange, FilterSession, SimpleFilter};

use super::{load_config, load_dataset, print_issues, print_metadata, split_assignment, write_dataset};

/// Raw filter arguments as given on the command line.
pub struct FilterArgs {
    pub ranges: Vec<String>,
    pub values: Vec<String>,
    pub searches: Vec<String>,
    pub dates: Vec<String>,
}

impl FilterArgs {
    /// Parse into filters: ranges, then values, then searches, then dates.
    fn into_filters(self) -> Result<Vec<SimpleFilter>, Box<dyn std::error::Error>> {
        let mut filters = Vec::new();

        for arg in &self.ranges {
            let (column, range) = split_assignment(arg)?;
            let (min, max) = range
                .split_once(':')
                .ok_or_else(|| format!("Expected MIN:MAX in '{}'", arg))?;
            let min: f64 = min.trim().parse().map_err(|_| format!("Invalid minimum in '{}'", arg))?;
            let max: f64 = max.trim().parse().map_err(|_| format!("Invalid maximum in '{}'", arg))?;
            filters.push(SimpleFilter::numeric(column, min, max));
        }

        for arg in &self.values {
            let (column, list) = split_assignment(arg)?;
            let values: Vec<&str> = list.split(',').map(str::trim).filter(|v| !v.is_empty()).collect();
            filters.push(SimpleFilter::values(column, values));
        }

        for arg in &self.searches {
            let (column, term) = split_assignment(arg)?;
            filters.push(SimpleFilter::search(column, term));
        }

        for arg in &self.dates {
            let (column, range) = split_assignment(arg)?;
            let (start, end) = range
                .split_once(':')
                .ok_or_else(|| format!("Expected START:END in '{}'", arg))?;
            let start = parse_date(start).ok_or_else(|| format!("Invalid start date in '{}'", arg))?;
            let end = parse_date(end).ok_or_else(|| format!("Invalid end date in '{}'", arg))?;
            filters.push(SimpleFilter::dates(column, DateRange::new(start, end)));
        }

        Ok(filters)
    }
}

pub fn run(
    file: PathBuf,
    args: FilterArgs,
    output: Option<PathBuf>,
    json_output: bool,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let (dataset, _) = load_dataset(&file)?;
    let filters = args.into_filters()?;

    let mut session = FilterSession::with_config(dataset, config);
    let outcome = session.apply_simple_filters(&filters);

    if json_output {
        let report = serde_json::json!({
            "metadata": session.metadata(),
            "issues": outcome.issues,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_issues(&outcome.issues);
    print_metadata(session.metadata());
    write_dataset(&outcome.dataset, output.as_deref())
}
