//! Display formatting and delimited-text export of result tables.

mod delimited;
mod format;

pub use delimited::{write_delimited, DelimitedOptions};
pub use format::{format_effect, format_percent, round_effect, ColumnKind, EFFECT_DECIMALS};
