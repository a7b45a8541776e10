//! Input validation and measure role binding.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{MixshiftError, Result};

/// Minimum number of numeric columns needed to bind every measure role.
pub const REQUIRED_MEASURES: usize = 4;

/// Names of the four measure columns, bound by role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureColumns {
    /// Base-period population.
    pub base_pop: String,
    /// Current-period population.
    pub curr_pop: String,
    /// Base-period sub-count (e.g. refunds).
    pub base_sub: String,
    /// Current-period sub-count.
    pub curr_sub: String,
}

impl MeasureColumns {
    /// Role-ordered column names.
    pub fn names(&self) -> [&str; 4] {
        [&self.base_pop, &self.curr_pop, &self.base_sub, &self.curr_sub]
    }

    fn contains(&self, name: &str) -> bool {
        self.names().contains(&name)
    }
}

/// Column classification produced by [`validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRoles {
    /// The measure columns bound to their roles.
    pub measures: MeasureColumns,
    /// Every numeric column, in table order.
    pub numeric: Vec<String>,
    /// Every non-numeric column, in table order. These are the candidate dimensions.
    pub dimensions: Vec<String>,
}

impl ColumnRoles {
    /// Numeric columns beyond the four bound measures; they take no part in the analysis.
    pub fn unused_numeric(&self) -> &[String] {
        self.numeric.get(REQUIRED_MEASURES..).unwrap_or_default()
    }

    /// Validate a dimension selection against the dataset's columns.
    ///
    /// Returns the selection as owned names, preserving order.
    pub fn select_dimensions<S: AsRef<str>>(&self, requested: &[S]) -> Result<Vec<String>> {
        if requested.is_empty() {
            return Err(MixshiftError::InputShape(
                "no dimension columns selected".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut selected = Vec::with_capacity(requested.len());

        for name in requested {
            let name = name.as_ref();
            if self.measures.contains(name) || self.numeric.iter().any(|n| n == name) {
                return Err(MixshiftError::InputShape(format!(
                    "column '{}' is numeric and cannot be used as a dimension",
                    name
                )));
            }
            if !self.dimensions.iter().any(|d| d == name) {
                return Err(MixshiftError::UnknownColumn(name.to_string()));
            }
            if !seen.insert(name) {
                return Err(MixshiftError::InputShape(format!(
                    "dimension column '{}' selected more than once",
                    name
                )));
            }
            selected.push(name.to_string());
        }

        Ok(selected)
    }

    /// Every dimension column, failing if the dataset has none.
    pub fn all_dimensions(&self) -> Result<Vec<String>> {
        self.select_dimensions(&self.dimensions)
    }
}

/// Classify the dataset's columns and bind the first four numeric columns to
/// the base population, current population, base sub-count and current
/// sub-count roles.
pub fn validate(dataset: &Dataset) -> Result<ColumnRoles> {
    let (numeric, dimensions): (Vec<_>, Vec<_>) =
        dataset.columns().iter().partition(|c| c.is_numeric());

    let numeric: Vec<String> = numeric.into_iter().map(|c| c.name.clone()).collect();
    let dimensions: Vec<String> = dimensions.into_iter().map(|c| c.name.clone()).collect();

    if numeric.len() < REQUIRED_MEASURES {
        return Err(MixshiftError::InputShape(format!(
            "fewer than {} numeric columns (found {}); expected base population, \
             current population, base sub-count and current sub-count",
            REQUIRED_MEASURES,
            numeric.len()
        )));
    }

    let measures = MeasureColumns {
        base_pop: numeric[0].clone(),
        curr_pop: numeric[1].clone(),
        base_sub: numeric[2].clone(),
        curr_sub: numeric[3].clone(),
    };

    Ok(ColumnRoles {
        measures,
        numeric,
        dimensions,
    })
}
