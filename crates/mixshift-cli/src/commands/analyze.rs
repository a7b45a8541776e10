//! Analyze command - decompose a data file and print or export the result.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use log::debug;
use mixshift::{Decomposition, DecompositionConfig, DecompositionResult, MappingConfig, MappingRules};

use crate::cli::OutputFormat;
use crate::{display, export};

/// Tolerance for the reconciliation check, in percentage points.
const RECONCILIATION_TOLERANCE: f64 = 1e-6;

pub struct AnalyzeArgs {
    pub file: PathBuf,
    pub dimensions: Vec<String>,
    pub map_column: Option<String>,
    pub map_rules: Vec<String>,
    pub map_file: Option<PathBuf>,
    pub combinations: bool,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub bom: bool,
    pub verbose: bool,
}

/// Merge the configuration file with command-line flags; flags win.
fn build_config(args: &AnalyzeArgs) -> Result<DecompositionConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => DecompositionConfig::load(path)?,
        None => DecompositionConfig::default(),
    };

    if !args.dimensions.is_empty() {
        config.dimensions = args.dimensions.clone();
    }
    if args.combinations {
        config.track_combinations = true;
    }

    if let Some(column) = &args.map_column {
        let mut text = match &args.map_file {
            Some(path) => fs::read_to_string(path)
                .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?,
            None => String::new(),
        };
        for rule in &args.map_rules {
            text.push('\n');
            text.push_str(rule);
        }
        config.mapping = Some(MappingConfig {
            column: column.clone(),
            groups: MappingRules::parse(&text)?,
        });
    }

    debug!("config: {config:?}");
    Ok(config)
}

pub fn run(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Validate input file exists
    if !args.file.exists() {
        return Err(format!("File not found: {}", args.file.display()).into());
    }

    let config = build_config(&args)?;

    println!(
        "{} {}",
        "Analyzing".cyan().bold(),
        args.file.display().to_string().white()
    );

    let result = Decomposition::with_config(config).analyze(&args.file)?;

    print_summary(&result, args.verbose);
    println!();
    println!("{}", display::result_table(&result.table));
    println!();
    print_reconciliation(&result);

    if let Some(output) = &args.output {
        let format = args
            .format
            .or_else(|| OutputFormat::from_path(output))
            .unwrap_or_default();
        export::write_output(&result, output, format, args.bom)?;

        println!();
        println!(
            "{} {} ({})",
            "Saved to".green().bold(),
            output.display().to_string().white(),
            format
        );
    }

    Ok(())
}

fn print_summary(result: &DecompositionResult, verbose: bool) {
    if verbose {
        if let Some(source) = &result.source {
            println!();
            println!("{}", "Source:".yellow().bold());
            println!("  Format:  {}", source.format);
            println!("  Rows:    {}", source.row_count);
            println!("  Columns: {}", source.column_count);
            println!("  Hash:    {}", source.hash);
        }
    }

    let m = &result.roles.measures;
    println!();
    println!("{}", "Measures:".yellow().bold());
    println!("  Base population:    {}", m.base_pop.white());
    println!("  Current population: {}", m.curr_pop.white());
    println!("  Base sub-count:     {}", m.base_sub.white());
    println!("  Current sub-count:  {}", m.curr_sub.white());

    let unused = result.roles.unused_numeric();
    if !unused.is_empty() {
        println!(
            "  {} {}",
            "Ignored numeric columns:".dimmed(),
            unused.join(", ").dimmed()
        );
    }

    println!(
        "Grouped by {} into {} groups",
        result.dimensions.join(", ").white().bold(),
        result.table.group_rows().len().to_string().white().bold()
    );

    if let Some(summary) = &result.combinations {
        println!(
            "Combinations: {} new, {} vanished, {} in both",
            summary.new.to_string().green(),
            summary.vanished.to_string().red(),
            summary.both.to_string().white()
        );
        if summary.neither > 0 {
            println!(
                "  {} groups have no population in either period",
                summary.neither.to_string().yellow()
            );
        }
    }
}

fn print_reconciliation(result: &DecompositionResult) {
    let rec = &result.reconciliation;
    let fmt = |v: Option<f64>| v.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "n/a".into());

    println!(
        "Overall rate change: {} pp, sum of effects: {} pp",
        fmt(rec.expected).white().bold(),
        fmt(rec.actual).white().bold()
    );

    if rec.undefined_groups > 0 {
        println!(
            "{} {} groups have undefined effects and are left out of the total",
            "Warning:".yellow().bold(),
            rec.undefined_groups
        );
    } else if rec.holds(RECONCILIATION_TOLERANCE) {
        println!("{}", "Effects reconcile with the overall change.".green());
    } else {
        println!(
            "{} effects differ from the overall change by {} pp",
            "Warning:".yellow().bold(),
            fmt(rec.gap())
        );
    }
}
