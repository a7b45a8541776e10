//! Table-level schema definition.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::column::ColumnSchema;
use super::types::infer_column_type;
use crate::input::DataTable;

/// Schema for an entire table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSchema {
    /// Schemas for each column, in table order.
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    /// Create a table schema with the given columns.
    pub fn with_columns(columns: Vec<ColumnSchema>) -> Self {
        Self { columns }
    }

    /// Infer the schema of every column in a table.
    pub fn infer(table: &DataTable) -> Self {
        let columns = table
            .headers
            .iter()
            .enumerate()
            .map(|(position, name)| {
                let mut column = ColumnSchema::new(name.clone(), position);
                column.inferred_type = infer_column_type(table.column_values(position));

                let mut distinct = HashSet::new();
                for value in table.column_values(position) {
                    if DataTable::is_null_value(value) {
                        column.null_count += 1;
                    } else {
                        distinct.insert(value.trim());
                    }
                }
                column.unique_count = distinct.len();
                column
            })
            .collect();

        Self { columns }
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get all column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Numeric columns in table order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    /// Non-numeric columns in table order.
    pub fn categorical_columns(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns.iter().filter(|c| !c.is_numeric())
    }
}
