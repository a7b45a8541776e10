//! Core type definitions for schema representation.

use serde::{Deserialize, Serialize};

use crate::input::DataTable;

/// Inferred data type for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers (no decimal point).
    Integer,
    /// Floating-point numbers.
    Float,
    /// Boolean words (true/false, yes/no).
    Boolean,
    /// Text/string values.
    String,
    /// Every value is null.
    #[default]
    Unknown,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

/// Infer the type of a column from its raw cell values.
///
/// Nulls are ignored. A column is numeric only if every non-null value
/// parses as a number; a single float promotes an integer column to
/// [`ColumnType::Float`].
pub fn infer_column_type<'a>(values: impl IntoIterator<Item = &'a str>) -> ColumnType {
    let mut inferred = ColumnType::Unknown;

    for value in values {
        if DataTable::is_null_value(value) {
            continue;
        }
        let detected = detect_value_type(value);
        inferred = match (inferred, detected) {
            (ColumnType::Unknown, t) => t,
            (a, b) if a == b => a,
            (ColumnType::Integer, ColumnType::Float) | (ColumnType::Float, ColumnType::Integer) => {
                ColumnType::Float
            }
            _ => return ColumnType::String,
        };
    }

    inferred
}

/// Detect the type of a single non-null value.
fn detect_value_type(value: &str) -> ColumnType {
    let trimmed = value.trim();

    if matches!(
        trimmed.to_lowercase().as_str(),
        "true" | "false" | "yes" | "no"
    ) {
        return ColumnType::Boolean;
    }

    if trimmed.parse::<i64>().is_ok() {
        return ColumnType::Integer;
    }

    // "inf" and "nan" parse as f64 but are not measurements
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => ColumnType::Float,
        _ => ColumnType::String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_column() {
        assert_eq!(infer_column_type(["1", "20", "-3"]), ColumnType::Integer);
    }

    #[test]
    fn test_mixed_numbers_promote_to_float() {
        assert_eq!(infer_column_type(["1", "2.5", "3"]), ColumnType::Float);
    }

    #[test]
    fn test_nulls_are_ignored() {
        assert_eq!(infer_column_type(["1", "", "NA", "4"]), ColumnType::Integer);
    }

    #[test]
    fn test_any_text_makes_string() {
        assert_eq!(infer_column_type(["1", "two", "3"]), ColumnType::String);
    }

    #[test]
    fn test_boolean_words() {
        assert_eq!(infer_column_type(["true", "False"]), ColumnType::Boolean);
        assert!(!ColumnType::Boolean.is_numeric());
    }

    #[test]
    fn test_all_null_is_unknown() {
        assert_eq!(infer_column_type(["", "null"]), ColumnType::Unknown);
        assert!(!ColumnType::Unknown.is_numeric());
    }

    #[test]
    fn test_infinity_is_not_numeric() {
        assert_eq!(infer_column_type(["inf", "1"]), ColumnType::String);
    }
}
