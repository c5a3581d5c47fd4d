//! Join command - join two data files on key columns.

use std::path::PathBuf;

use colored::Colorize;
use sift::{check_key_types, DatasetPool, FilterSession, JoinKind, JoinSpec};

use super::{load_config, load_dataset, print_issues, print_metadata, write_dataset};

#[allow(clippy::too_many_arguments)]
pub fn run(
    left: PathBuf,
    right: PathBuf,
    left_key: String,
    right_key: String,
    how: String,
    auto_fix: bool,
    output: Option<PathBuf>,
    json_output: bool,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let kind: JoinKind = how.parse()?;

    let (left_data, left_source) = load_dataset(&left)?;
    let (right_data, right_source) = load_dataset(&right)?;
    let left_name = left_source.name.clone();
    let mut right_name = right_source.name.clone();
    if right_name == left_name {
        right_name = format!("{}_2", right_name);
    }

    if !json_output {
        eprintln!("{} {}", "left:".dimmed(), left_source.summary());
        eprintln!("{} {}", "right:".dimmed(), right_source.summary());
        let compatibility = check_key_types(&left_data, &right_data, &left_key, &right_key)?;
        if !compatibility.is_compatible() && !auto_fix {
            eprintln!(
                "{} key types differ; pass --auto-fix to convert them",
                "note:".yellow().bold()
            );
        }
    }

    let mut session = FilterSession::with_config(left_data.clone(), config);
    let pool = DatasetPool::new()
        .with(left_name.clone(), left_data)
        .with(right_name.clone(), right_data);
    let spec = JoinSpec::new(left_name, right_name, left_key, right_key)
        .with_kind(kind)
        .with_auto_fix(auto_fix);

    let outcome = session.apply_join(&pool, &spec);

    if json_output {
        let report = serde_json::json!({
            "applied": outcome.applied,
            "report": outcome.join,
            "metadata": session.metadata(),
            "issues": outcome.issues,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_issues(&outcome.issues);
    let Some(report) = outcome.join else {
        return Err("Join was not applied".into());
    };

    print_metadata(session.metadata());
    eprintln!(
        "{} {} join: {} x {} rows -> {} rows, {} columns ({:.1}% efficiency)",
        "Join".cyan().bold(),
        report.kind,
        report.left_rows,
        report.right_rows,
        report.result_rows,
        report.column_count,
        report.efficiency_pct
    );
    if let Some(coercion) = &report.coercion {
        eprintln!("  {} {}", "converted:".yellow(), coercion);
    }

    write_dataset(&outcome.dataset, output.as_deref())
}
