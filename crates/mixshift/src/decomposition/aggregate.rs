//! Group-by aggregation of the four measures.

use std::collections::BTreeMap;
use std::ops::AddAssign;

use log::debug;
use serde::{Deserialize, Serialize};

use super::roles::MeasureColumns;
use crate::dataset::{Dataset, DimValue};
use crate::error::{MixshiftError, Result};

/// Dimension values identifying one group, in dimension-selection order.
pub type GroupKey = Vec<DimValue>;

/// Summed measures for one group (or the whole table).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasureSums {
    pub base_pop: f64,
    pub curr_pop: f64,
    pub base_sub: f64,
    pub curr_sub: f64,
}

impl AddAssign for MeasureSums {
    fn add_assign(&mut self, rhs: Self) {
        self.base_pop += rhs.base_pop;
        self.curr_pop += rhs.curr_pop;
        self.base_sub += rhs.base_sub;
        self.curr_sub += rhs.curr_sub;
    }
}

/// Aggregated measures keyed by group, in ascending key order.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Dimension columns the keys are built from.
    pub dimensions: Vec<String>,
    /// One entry per distinct key.
    pub groups: BTreeMap<GroupKey, MeasureSums>,
}

impl Aggregation {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Grand totals, summed over groups in key order.
    pub fn totals(&self) -> MeasureSums {
        let mut totals = MeasureSums::default();
        for sums in self.groups.values() {
            totals += *sums;
        }
        totals
    }
}

/// Collect the group key of every row.
///
/// Shared with the combination tracker so both see identical keys.
pub(crate) fn row_keys<S: AsRef<str>>(dataset: &Dataset, dimensions: &[S]) -> Result<Vec<GroupKey>> {
    if dimensions.is_empty() {
        return Err(MixshiftError::InputShape(
            "no dimension columns selected".to_string(),
        ));
    }

    let columns = dimensions
        .iter()
        .map(|d| dataset.categorical_values(d.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    Ok((0..dataset.row_count())
        .map(|row| columns.iter().map(|col| col[row].clone()).collect())
        .collect())
}

/// Group rows by the exact tuple of dimension values and sum the measures.
///
/// Missing measure cells add nothing. Nulls in dimension columns form their
/// own group. Rows are accumulated in table order so repeated runs produce
/// identical floating-point sums.
pub fn aggregate<S: AsRef<str>>(
    dataset: &Dataset,
    measures: &MeasureColumns,
    dimensions: &[S],
) -> Result<Aggregation> {
    let keys = row_keys(dataset, dimensions)?;

    let base_pop = dataset.numeric_values(&measures.base_pop)?;
    let curr_pop = dataset.numeric_values(&measures.curr_pop)?;
    let base_sub = dataset.numeric_values(&measures.base_sub)?;
    let curr_sub = dataset.numeric_values(&measures.curr_sub)?;

    let mut groups: BTreeMap<GroupKey, MeasureSums> = BTreeMap::new();
    for (row, key) in keys.into_iter().enumerate() {
        *groups.entry(key).or_default() += MeasureSums {
            base_pop: base_pop[row].unwrap_or(0.0),
            curr_pop: curr_pop[row].unwrap_or(0.0),
            base_sub: base_sub[row].unwrap_or(0.0),
            curr_sub: curr_sub[row].unwrap_or(0.0),
        };
    }

    debug!(
        "Aggregated {} rows into {} groups",
        dataset.row_count(),
        groups.len()
    );

    Ok(Aggregation {
        dimensions: dimensions.iter().map(|d| d.as_ref().to_string()).collect(),
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    fn measures() -> MeasureColumns {
        MeasureColumns {
            base_pop: "in0".into(),
            curr_pop: "in1".into(),
            base_sub: "ref0".into(),
            curr_sub: "ref1".into(),
        }
    }

    fn dataset(dims: Vec<DimValue>, cities: Vec<DimValue>, base_pop: Vec<Option<f64>>) -> Dataset {
        let n = dims.len();
        Dataset::from_columns(vec![
            Column::categorical("grade", dims),
            Column::categorical("city", cities),
            Column::numeric("in0", base_pop),
            Column::numeric("in1", vec![Some(1.0); n]),
            Column::numeric("ref0", vec![Some(0.5); n]),
            Column::numeric("ref1", vec![None; n]),
        ])
        .unwrap()
    }

    #[test]
    fn test_groups_and_sums() {
        let ds = dataset(
            vec!["B".into(), "A".into(), "B".into()],
            vec!["x".into(), "x".into(), "x".into()],
            vec![Some(10.0), Some(20.0), Some(5.0)],
        );
        let agg = aggregate(&ds, &measures(), &["grade"]).unwrap();

        assert_eq!(agg.dimensions, vec!["grade"]);
        let keys: Vec<_> = agg.groups.keys().cloned().collect();
        assert_eq!(keys, vec![vec![DimValue::from("A")], vec![DimValue::from("B")]]);

        let b = agg.groups[&vec![DimValue::from("B")]];
        assert_eq!(b.base_pop, 15.0);
        assert_eq!(b.curr_pop, 2.0);
        assert_eq!(b.base_sub, 1.0);
        assert_eq!(b.curr_sub, 0.0);

        let totals = agg.totals();
        assert_eq!(totals.base_pop, 35.0);
        assert_eq!(totals.curr_pop, 3.0);
    }

    #[test]
    fn test_null_dimension_values_share_a_group() {
        let ds = dataset(
            vec![DimValue::Null, "A".into(), DimValue::Null],
            vec!["x".into(), "x".into(), "x".into()],
            vec![Some(1.0), Some(2.0), Some(4.0)],
        );
        let agg = aggregate(&ds, &measures(), &["grade"]).unwrap();

        assert_eq!(agg.len(), 2);
        let last = agg.groups.iter().next_back().unwrap();
        assert_eq!(last.0, &vec![DimValue::Null]);
        assert_eq!(last.1.base_pop, 5.0);
    }

    #[test]
    fn test_multi_dimension_keys_follow_selection_order() {
        let ds = dataset(
            vec!["A".into(), "A".into()],
            vec!["x".into(), "y".into()],
            vec![Some(1.0), Some(1.0)],
        );
        let agg = aggregate(&ds, &measures(), &["city", "grade"]).unwrap();

        assert_eq!(agg.dimensions, vec!["city", "grade"]);
        assert!(agg.groups.contains_key(&vec![DimValue::from("y"), DimValue::from("A")]));
    }

    #[test]
    fn test_zero_population_group_is_kept() {
        let ds = dataset(
            vec!["A".into(), "B".into()],
            vec!["x".into(), "x".into()],
            vec![Some(0.0), None],
        );
        let agg = aggregate(&ds, &measures(), &["grade"]).unwrap();
        assert_eq!(agg.len(), 2);
        assert_eq!(agg.totals().base_pop, 0.0);
    }

    #[test]
    fn test_empty_selection_fails() {
        let ds = dataset(vec!["A".into()], vec!["x".into()], vec![Some(1.0)]);
        let empty: [&str; 0] = [];
        assert!(matches!(
            aggregate(&ds, &measures(), &empty),
            Err(MixshiftError::InputShape(_))
        ));
    }
}
