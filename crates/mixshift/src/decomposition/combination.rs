//! Tracking of dimension combinations that exist in only one period.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use super::aggregate::{row_keys, Aggregation, GroupKey};
use super::roles::MeasureColumns;
use crate::dataset::Dataset;
use crate::error::Result;

/// Which periods a group key is present in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationStatus {
    /// Present in the current period only.
    New,
    /// Present in the base period only.
    Vanished,
    /// Present in both periods.
    Both,
    /// Present in neither period (zero population on both sides).
    Neither,
}

impl CombinationStatus {
    fn classify(in_base: bool, in_current: bool) -> Self {
        match (in_base, in_current) {
            (true, true) => CombinationStatus::Both,
            (true, false) => CombinationStatus::Vanished,
            (false, true) => CombinationStatus::New,
            (false, false) => CombinationStatus::Neither,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CombinationStatus::New => "new",
            CombinationStatus::Vanished => "vanished",
            CombinationStatus::Both => "both",
            CombinationStatus::Neither => "neither",
        }
    }
}

impl fmt::Display for CombinationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of groups in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationSummary {
    pub new: usize,
    pub vanished: usize,
    pub both: usize,
    pub neither: usize,
}

impl CombinationSummary {
    pub fn from_statuses<'a>(statuses: impl IntoIterator<Item = &'a CombinationStatus>) -> Self {
        let mut summary = Self::default();
        for status in statuses {
            match status {
                CombinationStatus::New => summary.new += 1,
                CombinationStatus::Vanished => summary.vanished += 1,
                CombinationStatus::Both => summary.both += 1,
                CombinationStatus::Neither => summary.neither += 1,
            }
        }
        summary
    }
}

/// Keys whose summed `measure` is nonzero, aggregating that column alone.
pub fn period_keys<S: AsRef<str>>(
    dataset: &Dataset,
    measure: &str,
    dimensions: &[S],
) -> Result<BTreeSet<GroupKey>> {
    let values = dataset.numeric_values(measure)?;
    let keys = row_keys(dataset, dimensions)?;

    let mut sums: BTreeMap<GroupKey, f64> = BTreeMap::new();
    for (key, value) in keys.into_iter().zip(values) {
        *sums.entry(key).or_default() += value.unwrap_or(0.0);
    }

    Ok(sums
        .into_iter()
        .filter(|(_, total)| *total != 0.0)
        .map(|(key, _)| key)
        .collect())
}

/// Classify every group of `aggregation` by the periods it appears in.
///
/// The base and current key sets are computed independently from the
/// `base_pop` and `curr_pop` columns, then compared against each key of the
/// combined aggregation.
pub fn track_combinations(
    dataset: &Dataset,
    measures: &MeasureColumns,
    aggregation: &Aggregation,
) -> Result<BTreeMap<GroupKey, CombinationStatus>> {
    let base = period_keys(dataset, &measures.base_pop, &aggregation.dimensions)?;
    let current = period_keys(dataset, &measures.curr_pop, &aggregation.dimensions)?;

    debug!(
        "Combination sets: {} base, {} current, {} shared",
        base.len(),
        current.len(),
        base.intersection(&current).count()
    );

    Ok(aggregation
        .groups
        .keys()
        .map(|key| {
            let status = CombinationStatus::classify(base.contains(key), current.contains(key));
            (key.clone(), status)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, DimValue};
    use crate::decomposition::aggregate;

    fn measures() -> MeasureColumns {
        MeasureColumns {
            base_pop: "in0".into(),
            curr_pop: "in1".into(),
            base_sub: "ref0".into(),
            curr_sub: "ref1".into(),
        }
    }

    fn dataset() -> Dataset {
        let grades = ["A", "B", "C", "D", "A"];
        let n = grades.len();
        Dataset::from_columns(vec![
            Column::categorical("grade", grades.iter().map(|g| DimValue::from(*g)).collect()),
            Column::numeric("in0", vec![Some(10.0), Some(5.0), Some(0.0), None, Some(0.0)]),
            Column::numeric("in1", vec![Some(0.0), Some(7.0), Some(3.0), Some(0.0), Some(4.0)]),
            Column::numeric("ref0", vec![Some(0.0); n]),
            Column::numeric("ref1", vec![Some(0.0); n]),
        ])
        .unwrap()
    }

    fn key(g: &str) -> GroupKey {
        vec![DimValue::from(g)]
    }

    #[test]
    fn test_period_keys() {
        let ds = dataset();
        let base = period_keys(&ds, "in0", &["grade"]).unwrap();
        let current = period_keys(&ds, "in1", &["grade"]).unwrap();

        assert_eq!(base, [key("A"), key("B")].into_iter().collect());
        assert_eq!(current, [key("A"), key("B"), key("C")].into_iter().collect());
    }

    #[test]
    fn test_track_combinations() {
        let ds = dataset();
        let agg = aggregate(&ds, &measures(), &["grade"]).unwrap();
        let statuses = track_combinations(&ds, &measures(), &agg).unwrap();

        assert_eq!(statuses[&key("A")], CombinationStatus::Both);
        assert_eq!(statuses[&key("B")], CombinationStatus::Both);
        assert_eq!(statuses[&key("C")], CombinationStatus::New);
        assert_eq!(statuses[&key("D")], CombinationStatus::Neither);

        let summary = CombinationSummary::from_statuses(statuses.values());
        assert_eq!(
            summary,
            CombinationSummary {
                new: 1,
                vanished: 0,
                both: 2,
                neither: 1
            }
        );
    }

    #[test]
    fn test_vanished() {
        let ds = Dataset::from_columns(vec![
            Column::categorical("grade", vec![DimValue::from("A"), DimValue::from("B")]),
            Column::numeric("in0", vec![Some(3.0), Some(3.0)]),
            Column::numeric("in1", vec![Some(3.0), Some(0.0)]),
            Column::numeric("ref0", vec![Some(0.0); 2]),
            Column::numeric("ref1", vec![Some(0.0); 2]),
        ])
        .unwrap();
        let agg = aggregate(&ds, &measures(), &["grade"]).unwrap();
        let statuses = track_combinations(&ds, &measures(), &agg).unwrap();
        assert_eq!(statuses[&key("B")], CombinationStatus::Vanished);
        assert_eq!(statuses[&key("B")].to_string(), "vanished");
    }
}
