//! Column schema definition.

use serde::{Deserialize, Serialize};

use super::types::ColumnType;

/// Schema for a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name.
    pub name: String,
    /// Zero-based position in the table.
    pub position: usize,
    /// Inferred data type.
    pub inferred_type: ColumnType,
    /// Number of null/missing values.
    pub null_count: usize,
    /// Number of distinct non-null values.
    pub unique_count: usize,
}

impl ColumnSchema {
    /// Create a new column schema with basic information.
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
            inferred_type: ColumnType::Unknown,
            null_count: 0,
            unique_count: 0,
        }
    }

    /// Whether the column can be bound to a measure role.
    pub fn is_numeric(&self) -> bool {
        self.inferred_type.is_numeric()
    }

    /// Whether any null values are present.
    pub fn nullable(&self) -> bool {
        self.null_count > 0
    }
}
