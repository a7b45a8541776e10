//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// mixshift: split a rate change into structural and rate effects
#[derive(Parser, Debug)]
#[command(name = "mixshift")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decompose the change in the overall rate of a data file
    Analyze {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Dimension column to group by (repeatable; default: all text columns)
        #[arg(short, long = "dimension", value_name = "COLUMN")]
        dimensions: Vec<String>,

        /// Dimension column whose values are remapped before grouping
        #[arg(long, value_name = "COLUMN")]
        map_column: Option<String>,

        /// Mapping rule `label=a|b|c` (repeatable)
        #[arg(long = "map", value_name = "RULE", requires = "map_column")]
        map_rules: Vec<String>,

        /// File of mapping rules, one `label=a|b|c` per line
        #[arg(long, value_name = "PATH", requires = "map_column")]
        map_file: Option<PathBuf>,

        /// Classify groups as new, vanished or present in both periods
        #[arg(long)]
        combinations: bool,

        /// JSON configuration file; command-line flags take precedence
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Write the result table to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (default: from the output extension, else csv)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Prefix delimited output with a UTF-8 byte order mark
        #[arg(long)]
        bom: bool,
    },

    /// Show inferred column types and the measure binding
    Columns {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    Json,
    Xlsx,
}

impl OutputFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" | "tab" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            "xlsx" | "excel" => Ok(OutputFormat::Xlsx),
            _ => Err(format!("Unknown format: {}. Use csv, tsv, json, or xlsx.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Tsv => write!(f, "tsv"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Xlsx => write!(f, "xlsx"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_args() {
        let cli = Cli::try_parse_from([
            "mixshift",
            "analyze",
            "data.csv",
            "-d",
            "grade",
            "-d",
            "campus",
            "--map-column",
            "grade",
            "--map",
            "Lower=G1|G2",
            "--combinations",
            "-f",
            "xlsx",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze {
                dimensions,
                map_column,
                map_rules,
                combinations,
                format,
                ..
            } => {
                assert_eq!(dimensions, vec!["grade", "campus"]);
                assert_eq!(map_column.as_deref(), Some("grade"));
                assert_eq!(map_rules, vec!["Lower=G1|G2"]);
                assert!(combinations);
                assert_eq!(format, Some(OutputFormat::Xlsx));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_map_requires_column() {
        let result = Cli::try_parse_from(["mixshift", "analyze", "data.csv", "--map", "a=b"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out.XLSX")),
            Some(OutputFormat::Xlsx)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("out.tsv")),
            Some(OutputFormat::Tsv)
        );
        assert_eq!(OutputFormat::from_path(Path::new("out")), None);
    }
}
