//! Copy-on-write remapping of one dimension column.

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, DimValue};
use crate::error::Result;

/// Replaces raw values of one dimension column with group labels.
///
/// Values missing from `lookup` keep their raw value, so an empty lookup is
/// the identity mapping. Null cells are never remapped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueMapping {
    /// The dimension column to remap.
    pub column: String,
    /// Raw value to group label.
    pub lookup: HashMap<String, String>,
}

impl ValueMapping {
    pub fn new(column: impl Into<String>, lookup: HashMap<String, String>) -> Self {
        Self {
            column: column.into(),
            lookup,
        }
    }

    /// A mapping that leaves the column unchanged.
    pub fn identity(column: impl Into<String>) -> Self {
        Self::new(column, HashMap::new())
    }

    pub fn is_identity(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Map a single value.
    pub fn map_value(&self, value: &DimValue) -> DimValue {
        match value {
            DimValue::Value(raw) => match self.lookup.get(raw) {
                Some(label) => DimValue::Value(label.clone()),
                None => value.clone(),
            },
            DimValue::Null => DimValue::Null,
        }
    }

    /// Get a human-readable description of the mapping.
    pub fn description(&self) -> String {
        let mut pairs: Vec<(&String, &String)> = self.lookup.iter().collect();
        pairs.sort();
        let examples: Vec<String> = pairs
            .iter()
            .take(3)
            .map(|(from, to)| format!("'{}' → '{}'", from, to))
            .collect();
        let more = pairs.len().saturating_sub(examples.len());
        if more > 0 {
            format!("Map '{}': {} (+{} more)", self.column, examples.join(", "), more)
        } else {
            format!("Map '{}': {}", self.column, examples.join(", "))
        }
    }
}

/// Apply a value mapping, returning a new dataset.
///
/// The target must be a dimension column. The input dataset is not modified.
pub fn apply_mapping(dataset: &Dataset, mapping: &ValueMapping) -> Result<Dataset> {
    let values = dataset.categorical_values(&mapping.column)?;

    if mapping.is_identity() {
        debug!("Empty mapping for '{}', values pass through", mapping.column);
        return Ok(dataset.clone());
    }

    let mapped: Vec<DimValue> = values.iter().map(|v| mapping.map_value(v)).collect();
    let changed = values.iter().zip(&mapped).filter(|(a, b)| a != b).count();
    info!(
        "{} ({} of {} values changed)",
        mapping.description(),
        changed,
        values.len()
    );

    dataset.with_categorical(&mapping.column, mapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;
    use crate::error::MixshiftError;

    fn grades() -> Dataset {
        Dataset::from_columns(vec![
            Column::categorical(
                "grade",
                vec![
                    DimValue::from("G1"),
                    DimValue::from("G2"),
                    DimValue::from("G3"),
                    DimValue::Null,
                ],
            ),
            Column::numeric("n", vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]),
        ])
        .unwrap()
    }

    fn lower_grades() -> ValueMapping {
        let lookup = [("G1", "Lower"), ("G2", "Lower")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ValueMapping::new("grade", lookup)
    }

    #[test]
    fn test_mapping_replaces_and_passes_through() {
        let original = grades();
        let mapped = apply_mapping(&original, &lower_grades()).unwrap();

        assert_eq!(
            mapped.categorical_values("grade").unwrap(),
            &[
                DimValue::from("Lower"),
                DimValue::from("Lower"),
                DimValue::from("G3"),
                DimValue::Null,
            ]
        );
        assert_eq!(mapped.numeric_values("n").unwrap(), original.numeric_values("n").unwrap());
    }

    #[test]
    fn test_original_is_untouched() {
        let original = grades();
        let snapshot = original.clone();
        let _ = apply_mapping(&original, &lower_grades()).unwrap();
        assert_eq!(original, snapshot);
    }

    #[test]
    fn test_identity_mapping() {
        let original = grades();
        let mapped = apply_mapping(&original, &ValueMapping::identity("grade")).unwrap();
        assert_eq!(mapped, original);
    }

    #[test]
    fn test_mapping_numeric_column_fails() {
        let err = apply_mapping(&grades(), &ValueMapping::identity("n")).unwrap_err();
        assert!(matches!(err, MixshiftError::InputShape(_)));
    }

    #[test]
    fn test_mapping_unknown_column_fails() {
        let err = apply_mapping(&grades(), &ValueMapping::identity("city")).unwrap_err();
        assert!(matches!(err, MixshiftError::UnknownColumn(_)));
    }

    #[test]
    fn test_description() {
        assert_eq!(
            lower_grades().description(),
            "Map 'grade': 'G1' → 'Lower', 'G2' → 'Lower'"
        );
    }
}
