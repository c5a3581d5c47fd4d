//! Query command - run a multi-condition query.

use std::path::PathBuf;

use colored::Colorize;
use sift::{FilterSession, Query};

use super::{load_config, load_dataset, print_issues, print_metadata, write_dataset};

pub fn run(
    file: PathBuf,
    terms: Vec<String>,
    show_only: bool,
    output: Option<PathBuf>,
    json_output: bool,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let (dataset, _) = load_dataset(&file)?;
    let query = Query::from_terms(&terms)?;

    let mut session = FilterSession::with_config(dataset, config);

    if show_only {
        match session.preview_query(&query)? {
            Some(predicate) => println!("{}", predicate),
            None => eprintln!("{}", "Query has no conditions to apply".dimmed()),
        }
        return Ok(());
    }

    let outcome = session.apply_query(&query);

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
