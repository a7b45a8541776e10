//! Columns command - show inferred column types and measure roles.

use std::path::PathBuf;

use colored::Colorize;
use log::warn;
use mixshift::decomposition::validate;
use mixshift::{Dataset, Parser, TableSchema};

use crate::display;

pub fn run(
    file: PathBuf,
    json_output: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (table, source) = Parser::new().parse_file(&file)?;
    let schema = TableSchema::infer(&table);
    let dataset = Dataset::from_table_with_schema(&table, &schema)?;

    // A file that cannot be decomposed still has a schema worth showing
    let roles = match validate(&dataset) {
        Ok(roles) => Some(roles),
        Err(e) => {
            warn!("{}", e);
            None
        }
    };

    if json_output {
        let status = serde_json::json!({
            "source": source,
            "columns": schema.columns,
            "roles": roles,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {} ({} rows, {})",
        "Columns of".cyan().bold(),
        source.file.white(),
        source.row_count,
        source.format
    );
    println!("{}", display::schema_table(&schema, roles.as_ref()));
    println!();

    match &roles {
        Some(roles) if roles.dimensions.is_empty() => println!(
            "{} no text columns to group by",
            "Warning:".yellow().bold()
        ),
        Some(_) => println!(
            "Run {} to decompose.",
            format!("mixshift analyze {}", file.display()).cyan().bold()
        ),
        None => println!(
            "{} at least 4 numeric columns are needed: base population, \
             current population, base sub-count and current sub-count",
            "Warning:".yellow().bold()
        ),
    }

    Ok(())
}
