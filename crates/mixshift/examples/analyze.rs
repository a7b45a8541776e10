//! Example: Decompose the rate change in a tabular data file.
//!
//! Usage:
//!   cargo run --example analyze -- <file_path> [dimension...]
//!
//! Example:
//!   cargo run --example analyze -- enrolment.csv grade

use std::env;
use std::path::Path;

use mixshift::Decomposition;

fn main() -> mixshift::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example analyze -- <file_path> [dimension...]");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example analyze -- enrolment.csv grade");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Error: File not found: {}", file_path);
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Decomposition: {}", file_path);
    println!("{}", separator);
    println!();

    let result = Decomposition::new()
        .with_dimensions(args[2..].iter().cloned())
        .with_combinations(true)
        .analyze(path)?;

    if let Some(source) = &result.source {
        println!("## Source Metadata");
        println!("  File: {}", source.file);
        println!("  Format: {}", source.format);
        println!("  Rows: {}", source.row_count);
        println!("  Columns: {}", source.column_count);
        println!();
    }

    let m = &result.roles.measures;
    println!("## Measures");
    println!("  Base population:    {}", m.base_pop);
    println!("  Current population: {}", m.curr_pop);
    println!("  Base sub-count:     {}", m.base_sub);
    println!("  Current sub-count:  {}", m.curr_sub);
    println!("  Dimensions: {}", result.dimensions.join(", "));
    println!();

    println!("## Result ({} groups)", result.table.group_rows().len());
    println!();
    println!("  {}", result.table.header().join(" | "));
    for record in result.table.display_records() {
        println!("  {}", record.join(" | "));
    }
    println!();

    if let Some(summary) = &result.combinations {
        println!("## Combinations");
        println!(
            "  new: {}, vanished: {}, both: {}, neither: {}",
            summary.new, summary.vanished, summary.both, summary.neither
        );
        println!();
    }

    let rec = &result.reconciliation;
    println!("## Reconciliation");
    println!("  Overall change (pp): {:?}", rec.expected);
    println!("  Sum of effects (pp): {:?}", rec.actual);
    println!("  Undefined groups:    {}", rec.undefined_groups);
    println!();

    println!("{}", separator);

    Ok(())
}
