//! Dimension value remapping applied before aggregation.

mod mapping;
mod rules;

pub use mapping::{apply_mapping, ValueMapping};
pub use rules::MappingRules;
