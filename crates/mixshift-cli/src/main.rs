//! mixshift CLI - structural/rate effect decomposition.

mod cli;
mod commands;
mod display;
mod export;

use clap::Parser;
use cli::{Cli, Commands};
use log::{debug, LevelFilter};

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    let mut builder = pretty_env_logger::formatted_timed_builder();
    builder.filter_level(default_level);
    // RUST_LOG takes precedence over the default level
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!("args: {cli:?}");

    let result = match cli.command {
        Commands::Analyze {
            file,
            dimensions,
            map_column,
            map_rules,
            map_file,
            combinations,
            config,
            output,
            format,
            bom,
        } => commands::analyze::run(commands::analyze::AnalyzeArgs {
            file,
            dimensions,
            map_column,
            map_rules,
            map_file,
            combinations,
            config,
            output,
            format,
            bom,
            verbose: cli.verbose,
        }),

        Commands::Columns { file, json } => commands::columns::run(file, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
