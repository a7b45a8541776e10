//! Categorical cell values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value in a dimension (categorical) column.
///
/// Missing values are a first-class variant rather than being dropped, so
/// two rows that both lack a value compare equal and land in the same group.
/// The derived ordering places `Null` after every present value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimValue {
    Value(String),
    Null,
}

impl DimValue {
    /// Build a value from a raw cell, treating recognised null spellings as `Null`.
    pub fn from_cell(cell: &str) -> Self {
        if crate::input::DataTable::is_null_value(cell) {
            DimValue::Null
        } else {
            DimValue::Value(cell.trim().to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DimValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DimValue::Value(s) => Some(s),
            DimValue::Null => None,
        }
    }
}

impl From<&str> for DimValue {
    fn from(value: &str) -> Self {
        DimValue::Value(value.to_string())
    }
}

impl From<String> for DimValue {
    fn from(value: String) -> Self {
        DimValue::Value(value)
    }
}

impl<T: Into<DimValue>> From<Option<T>> for DimValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DimValue::Null, Into::into)
    }
}

impl fmt::Display for DimValue {
    /// Nulls display as an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimValue::Value(s) => f.write_str(s),
            DimValue::Null => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cell() {
        assert_eq!(DimValue::from_cell(" G1 "), DimValue::from("G1"));
        assert_eq!(DimValue::from_cell("NA"), DimValue::Null);
        assert_eq!(DimValue::from_cell(""), DimValue::Null);
    }

    #[test]
    fn test_nulls_are_equal_and_sort_last() {
        assert_eq!(DimValue::Null, DimValue::Null);
        assert!(DimValue::from("zzz") < DimValue::Null);

        let mut values = vec![DimValue::Null, DimValue::from("b"), DimValue::from("a")];
        values.sort();
        assert_eq!(
            values,
            vec![DimValue::from("a"), DimValue::from("b"), DimValue::Null]
        );
    }

    #[test]
    fn test_display_null_is_empty() {
        assert_eq!(DimValue::Null.to_string(), "");
        assert_eq!(DimValue::from("x").to_string(), "x");
    }
}
