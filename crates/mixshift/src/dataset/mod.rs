//! Typed in-memory dataset consumed by the decomposition pipeline.

mod value;

pub use value::DimValue;

use log::debug;

use crate::error::{MixshiftError, Result};
use crate::input::DataTable;
use crate::schema::{ColumnType, TableSchema};

/// Cell storage for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    /// Measure column; `None` marks a missing cell.
    Numeric(Vec<Option<f64>>),
    /// Dimension column.
    Categorical(Vec<DimValue>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Numeric(values),
        }
    }

    pub fn categorical(name: impl Into<String>, values: Vec<DimValue>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Categorical(values),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.values, ColumnValues::Numeric(_))
    }
}

/// An ordered collection of equally long, typed columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Build a dataset from columns, checking names are unique and lengths agree.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map_or(0, |c| c.values.len());

        for (i, column) in columns.iter().enumerate() {
            if column.values.len() != row_count {
                return Err(MixshiftError::InputShape(format!(
                    "column '{}' has {} values, expected {}",
                    column.name,
                    column.values.len(),
                    row_count
                )));
            }
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(MixshiftError::InputShape(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }

        Ok(Self { columns, row_count })
    }

    /// Convert a parsed table into typed columns using the inferred schema.
    pub fn from_table(table: &DataTable) -> Result<Self> {
        let schema = TableSchema::infer(table);
        Self::from_table_with_schema(table, &schema)
    }

    /// Convert a parsed table using an already inferred schema.
    pub fn from_table_with_schema(table: &DataTable, schema: &TableSchema) -> Result<Self> {
        let columns = schema
            .columns
            .iter()
            .map(|col| {
                let cells = table.column_values(col.position);
                match col.inferred_type {
                    ColumnType::Integer | ColumnType::Float => {
                        Column::numeric(col.name.clone(), cells.map(parse_number).collect())
                    }
                    _ => Column::categorical(col.name.clone(), cells.map(DimValue::from_cell).collect()),
                }
            })
            .collect();

        let dataset = Self::from_columns(columns)?;
        debug!(
            "Built dataset with {} rows and {} columns",
            dataset.row_count(),
            dataset.column_count()
        );
        Ok(dataset)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Look up a measure column by name.
    pub fn numeric_values(&self, name: &str) -> Result<&[Option<f64>]> {
        match self.column(name) {
            Some(Column {
                values: ColumnValues::Numeric(values),
                ..
            }) => Ok(values.as_slice()),
            Some(_) => Err(MixshiftError::InputShape(format!(
                "column '{}' is not numeric",
                name
            ))),
            None => Err(MixshiftError::UnknownColumn(name.to_string())),
        }
    }

    /// Look up a dimension column by name.
    pub fn categorical_values(&self, name: &str) -> Result<&[DimValue]> {
        match self.column(name) {
            Some(Column {
                values: ColumnValues::Categorical(values),
                ..
            }) => Ok(values.as_slice()),
            Some(_) => Err(MixshiftError::InputShape(format!(
                "column '{}' is numeric and cannot be used as a dimension",
                name
            ))),
            None => Err(MixshiftError::UnknownColumn(name.to_string())),
        }
    }

    /// Return a copy with one dimension column's values replaced.
    pub(crate) fn with_categorical(&self, name: &str, values: Vec<DimValue>) -> Result<Self> {
        let index = self
            .columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| MixshiftError::UnknownColumn(name.to_string()))?;

        let mut columns = self.columns.clone();
        columns[index] = Column::categorical(name, values);
        Self::from_columns(columns)
    }
}

fn parse_number(cell: &str) -> Option<f64> {
    if DataTable::is_null_value(cell) {
        return None;
    }
    cell.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Parser;

    #[test]
    fn test_from_table_types_columns() {
        let table = Parser::new()
            .parse_str("grade,base,curr\nG1,100,80\n,90,\n")
            .unwrap();
        let dataset = Dataset::from_table(&table).unwrap();

        assert_eq!(dataset.row_count(), 2);
        assert_eq!(
            dataset.categorical_values("grade").unwrap(),
            &[DimValue::from("G1"), DimValue::Null]
        );
        assert_eq!(dataset.numeric_values("base").unwrap(), &[Some(100.0), Some(90.0)]);
        assert_eq!(dataset.numeric_values("curr").unwrap(), &[Some(80.0), None]);
    }

    #[test]
    fn test_from_columns_rejects_ragged() {
        let err = Dataset::from_columns(vec![
            Column::numeric("a", vec![Some(1.0)]),
            Column::numeric("b", vec![Some(1.0), Some(2.0)]),
        ])
        .unwrap_err();
        assert!(matches!(err, MixshiftError::InputShape(_)));
    }

    #[test]
    fn test_from_columns_rejects_duplicate_names() {
        let err = Dataset::from_columns(vec![
            Column::numeric("a", vec![Some(1.0)]),
            Column::numeric("a", vec![Some(2.0)]),
        ])
        .unwrap_err();
        assert!(matches!(err, MixshiftError::InputShape(_)));
    }

    #[test]
    fn test_typed_lookups() {
        let dataset = Dataset::from_columns(vec![
            Column::categorical("dim", vec![DimValue::from("A")]),
            Column::numeric("n", vec![Some(1.0)]),
        ])
        .unwrap();

        assert!(matches!(
            dataset.numeric_values("dim"),
            Err(MixshiftError::InputShape(_))
        ));
        assert!(matches!(
            dataset.categorical_values("n"),
            Err(MixshiftError::InputShape(_))
        ));
        assert!(matches!(
            dataset.categorical_values("missing"),
            Err(MixshiftError::UnknownColumn(_))
        ));
    }
}
