//! mixshift: structural/rate effect decomposition for tabular data.
//!
//! Given population counts and sub-counts (for example enrolments and
//! refunds) for a base and a current period, broken down by categorical
//! dimensions, mixshift splits the change in the overall rate into a
//! **structural effect** (the population mix moved between groups) and a
//! **rate effect** (rates changed within groups).
//!
//! # Core Principles
//!
//! - **Additive**: group effects sum exactly to the change in the overall rate
//! - **Non-destructive**: the input dataset is never modified
//! - **Explicit gaps**: ratios with a zero denominator are `None`, never `0`
//!
//! # Example
//!
//! ```no_run
//! use mixshift::Decomposition;
//!
//! let result = Decomposition::new()
//!     .with_dimensions(["grade"])
//!     .analyze("enrolment.csv")
//!     .unwrap();
//!
//! for record in result.table.display_records() {
//!     println!("{}", record.join("\t"));
//! }
//! ```

pub mod dataset;
pub mod decomposition;
pub mod error;
pub mod export;
pub mod input;
pub mod schema;
pub mod transform;

mod pipeline;

pub use crate::pipeline::{Decomposition, DecompositionConfig, DecompositionResult, MappingConfig};
pub use dataset::{Column, ColumnValues, Dataset, DimValue};
pub use decomposition::{
    CombinationStatus, CombinationSummary, ColumnRoles, MeasureColumns, Reconciliation,
    ResultRow, ResultTable, RowLabel,
};
pub use error::{MixshiftError, Result};
pub use export::{write_delimited, DelimitedOptions};
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata};
pub use schema::{ColumnSchema, ColumnType, TableSchema};
pub use transform::{MappingRules, ValueMapping};
