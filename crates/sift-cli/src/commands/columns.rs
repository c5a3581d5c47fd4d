//! Columns command - classify columns and show filter choices.

use std::path::PathBuf;

use colored::Colorize;
use sift::{
    categorical_choices, classify, datetime_bounds, numeric_summary, CategoricalChoices, ColumnKind,
};

use super::{load_config, load_dataset};

pub fn run(
    file: PathBuf,
    json_output: bool,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let (dataset, source) = load_dataset(&file)?;
    let info = classify(&dataset);

    if json_output {
        let numeric: serde_json::Map<String, serde_json::Value> = info
            .numeric
            .iter()
            .filter_map(|c| {
                let summary = numeric_summary(&dataset, c).ok()?;
                Some((c.clone(), serde_json::to_value(summary).ok()?))
            })
            .collect();
        let categorical: serde_json::Map<String, serde_json::Value> = info
            .categorical
            .iter()
            .filter_map(|c| {
                let choices = categorical_choices(&dataset, c, config.categorical_threshold).ok()?;
                Some((c.clone(), serde_json::to_value(choices).ok()?))
            })
            .collect();
        let datetime: serde_json::Map<String, serde_json::Value> = info
            .datetime
            .iter()
            .filter_map(|c| {
                let bounds = datetime_bounds(&dataset, c).ok()?;
                Some((c.clone(), serde_json::to_value(bounds).ok()?))
            })
            .collect();

        let report = serde_json::json!({
            "source": source,
            "rows": dataset.row_count(),
            "columns": info,
            "numeric": numeric,
            "categorical": categorical,
            "datetime": datetime,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", "Columns of".cyan().bold(), source.summary().white());
    println!();

    for name in &info.all {
        let Some(kind) = info.kind_of(name) else {
            continue;
        };
        match kind {
            ColumnKind::Numeric => match numeric_summary(&dataset, name) {
                Ok(s) => println!(
                    "  {:<20} {} {} to {} ({} unique)",
                    name,
                    "numeric".green(),
                    s.min,
                    s.max,
                    s.unique_count
                ),
                Err(_) => println!("  {:<20} {} (no values)", name, "numeric".green()),
            },
            ColumnKind::Categorical => {
                match categorical_choices(&dataset, name, config.categorical_threshold) {
                    Ok(CategoricalChoices::Values { values }) => println!(
                        "  {:<20} {} {}",
                        name,
                        "categorical".yellow(),
                        values.join(", ")
                    ),
                    Ok(CategoricalChoices::Search { distinct }) => println!(
                        "  {:<20} {} {} distinct values, search only",
                        name,
                        "categorical".yellow(),
                        distinct
                    ),
                    Err(_) => println!("  {:<20} {}", name, "categorical".yellow()),
                }
            }
            ColumnKind::Datetime => match datetime_bounds(&dataset, name) {
                Ok(r) => println!(
                    "  {:<20} {} {} to {}",
                    name,
                    "datetime".blue(),
                    r.start,
                    r.end
                ),
                Err(_) => println!("  {:<20} {} (no values)", name, "datetime".blue()),
            },
            ColumnKind::Other => println!("  {:<20} {}", name, "other".dimmed()),
        }
    }

    Ok(())
}
