//! The decomposition core: role binding, aggregation, combination tracking
//! and the structural/rate effect computation.

mod aggregate;
mod combination;
mod decompose;
mod roles;

pub use aggregate::{aggregate, Aggregation, GroupKey, MeasureSums};
pub use combination::{period_keys, track_combinations, CombinationStatus, CombinationSummary};
pub use decompose::{
    decompose, Effects, Ratios, Reconciliation, ResultRow, ResultTable, RowLabel, TOTAL_LABEL,
};
pub use roles::{validate, ColumnRoles, MeasureColumns, REQUIRED_MEASURES};
