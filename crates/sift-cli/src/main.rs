//! Sift CLI - filter, query and join tabular data files.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Columns { file, json } => commands::columns::run(file, json, cli.config),

        Commands::Filter {
            file,
            ranges,
            values,
            searches,
            dates,
            output,
            json,
        } => commands::filter::run(
            file,
            commands::filter::FilterArgs {
                ranges,
                values,
                searches,
                dates,
            },
            output,
            json,
            cli.config,
        ),

        Commands::Query {
            file,
            terms,
            show,
            output,
            json,
        } => commands::query::run(file, terms, show, output, json, cli.config),

        Commands::Join {
            left,
            right,
            left_key,
            right_key,
            how,
            auto_fix,
            output,
            json,
        } => commands::join::run(
            left,
            right,
            left_key,
            right_key,
            how,
            auto_fix,
            output,
            json,
            cli.config,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
