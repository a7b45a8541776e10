//! Structural/rate effect decomposition.
//!
//! For each group `g`, with grand totals `T` over all groups:
//!
//! ```text
//! base_share(g) = g.base_pop / T.base_pop      curr_share(g) = g.curr_pop / T.curr_pop
//! base_rate(g)  = g.base_sub / g.base_pop      curr_rate(g)  = g.curr_sub / g.curr_pop
//! R0            = T.base_sub / T.base_pop
//!
//! structural(g) = (curr_share - base_share) * (base_rate - R0) * 100
//! rate(g)       = curr_share * (curr_rate - base_rate) * 100
//! total(g)      = structural + rate
//! ```
//!
//! Summed over groups, `total` equals the change in the overall rate in
//! percentage points. A zero denominator makes the ratio `None`, and `None`
//! propagates through every effect that depends on it.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::aggregate::{Aggregation, GroupKey, MeasureSums};
use super::combination::CombinationStatus;
use super::roles::MeasureColumns;
use crate::dataset::DimValue;

/// Label shown in every dimension column of the total row.
pub const TOTAL_LABEL: &str = "Total";

const PERCENTAGE_POINTS: f64 = 100.0;

/// `num / den`, undefined when the denominator is zero.
fn ratio(num: f64, den: f64) -> Option<f64> {
    if den == 0.0 { None } else { Some(num / den) }
}

/// Population shares and sub-count rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ratios {
    pub base_pop_share: Option<f64>,
    pub curr_pop_share: Option<f64>,
    pub base_rate: Option<f64>,
    pub curr_rate: Option<f64>,
}

/// Effects in percentage points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    pub structural: Option<f64>,
    pub rate: Option<f64>,
    pub total: Option<f64>,
}

impl Effects {
    fn compute(ratios: &Ratios, overall_base_rate: Option<f64>) -> Self {
        let structural = (|| {
            let share_shift = ratios.curr_pop_share? - ratios.base_pop_share?;
            let rate_gap = ratios.base_rate? - overall_base_rate?;
            Some(share_shift * rate_gap * PERCENTAGE_POINTS)
        })();
        let rate = (|| {
            Some(ratios.curr_pop_share? * (ratios.curr_rate? - ratios.base_rate?) * PERCENTAGE_POINTS)
        })();
        let total = structural.zip(rate).map(|(s, r)| s + r);

        Self {
            structural,
            rate,
            total,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.total.is_some()
    }
}

/// Sums the defined values; `None` when none are defined.
fn sum_defined(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    values.flatten().fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

/// Identifies a result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowLabel {
    Group(GroupKey),
    Total,
}

/// One row of the result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub label: RowLabel,
    pub sums: MeasureSums,
    pub ratios: Ratios,
    /// On a group row `total` is `structural + rate`, or `None` if either is.
    ///
    /// On the total row each field is summed on its own over the groups where
    /// it is defined. A group with a defined structural effect but no rate
    /// effect counts towards `structural` only, so there `total` can differ
    /// from `structural + rate`.
    pub effects: Effects,
    /// Only set when combination tracking ran; never set on the total row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combination: Option<CombinationStatus>,
}

impl ResultRow {
    pub fn is_total(&self) -> bool {
        matches!(self.label, RowLabel::Total)
    }

    pub fn group_key(&self) -> Option<&GroupKey> {
        match &self.label {
            RowLabel::Group(key) => Some(key),
            RowLabel::Total => None,
        }
    }
}

/// How closely the summed group effects match the change in overall rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// `(R1 - R0) * 100`, undefined if either period has zero population.
    pub expected: Option<f64>,
    /// The total row's `total` effect: the sum of every defined group total.
    pub actual: Option<f64>,
    /// Groups whose total effect is undefined and so missing from `actual`.
    pub undefined_groups: usize,
}

impl Reconciliation {
    /// `actual - expected`, when both are defined.
    pub fn gap(&self) -> Option<f64> {
        Some(self.actual? - self.expected?)
    }

    /// Whether the effects add up to the overall change within `tolerance`.
    pub fn holds(&self, tolerance: f64) -> bool {
        self.undefined_groups == 0 && self.gap().is_some_and(|g| g.abs() <= tolerance)
    }
}

/// Decomposition output: group rows in key order followed by one total row.
///
/// Deserializing checks that the rows end in exactly one total row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawResultTable")]
pub struct ResultTable {
    pub dimensions: Vec<String>,
    pub measures: MeasureColumns,
    rows: Vec<ResultRow>,
}

#[derive(Deserialize)]
struct RawResultTable {
    dimensions: Vec<String>,
    measures: MeasureColumns,
    rows: Vec<ResultRow>,
}

impl TryFrom<RawResultTable> for ResultTable {
    type Error = String;

    fn try_from(raw: RawResultTable) -> Result<Self, Self::Error> {
        let well_formed = raw.rows.split_last().is_some_and(|(last, groups)| {
            last.is_total() && !groups.iter().any(ResultRow::is_total)
        });
        if !well_formed {
            return Err("result rows must end with exactly one total row".to_string());
        }

        Ok(Self {
            dimensions: raw.dimensions,
            measures: raw.measures,
            rows: raw.rows,
        })
    }
}

impl ResultTable {
    /// Every row, the total row last.
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// The group rows, without the total row.
    pub fn group_rows(&self) -> &[ResultRow] {
        &self.rows[..self.rows.len() - 1]
    }

    pub fn total_row(&self) -> &ResultRow {
        &self.rows[self.rows.len() - 1]
    }

    pub fn has_combinations(&self) -> bool {
        self.group_rows().iter().any(|r| r.combination.is_some())
    }

    /// Find a group row by its key.
    pub fn group(&self, key: &[DimValue]) -> Option<&ResultRow> {
        self.group_rows()
            .iter()
            .find(|r| r.group_key().is_some_and(|k| k.as_slice() == key))
    }

    pub fn reconciliation(&self) -> Reconciliation {
        let total = self.total_row();
        let expected = total
            .ratios
            .curr_rate
            .zip(total.ratios.base_rate)
            .map(|(r1, r0)| (r1 - r0) * PERCENTAGE_POINTS);

        Reconciliation {
            expected,
            actual: total.effects.total,
            undefined_groups: self
                .group_rows()
                .iter()
                .filter(|r| !r.effects.is_defined())
                .count(),
        }
    }
}

/// Compute ratios and effects for every group and append the total row.
///
/// `combinations`, when given, attaches a status to each group row.
pub fn decompose(
    aggregation: &Aggregation,
    measures: &MeasureColumns,
    combinations: Option<&BTreeMap<GroupKey, CombinationStatus>>,
) -> ResultTable {
    let totals = aggregation.totals();
    let overall_base_rate = ratio(totals.base_sub, totals.base_pop);
    let overall_curr_rate = ratio(totals.curr_sub, totals.curr_pop);

    if overall_base_rate.is_none() {
        warn!("Base-period population is zero; every effect is undefined");
    }

    let mut rows: Vec<ResultRow> = aggregation
        .groups
        .iter()
        .map(|(key, sums)| {
            let ratios = Ratios {
                base_pop_share: ratio(sums.base_pop, totals.base_pop),
                curr_pop_share: ratio(sums.curr_pop, totals.curr_pop),
                base_rate: ratio(sums.base_sub, sums.base_pop),
                curr_rate: ratio(sums.curr_sub, sums.curr_pop),
            };
            let effects = Effects::compute(&ratios, overall_base_rate);
            ResultRow {
                label: RowLabel::Group(key.clone()),
                sums: *sums,
                ratios,
                effects,
                combination: combinations.and_then(|c| c.get(key).copied()),
            }
        })
        .collect();

    let effects = Effects {
        structural: sum_defined(rows.iter().map(|r| r.effects.structural)),
        rate: sum_defined(rows.iter().map(|r| r.effects.rate)),
        total: sum_defined(rows.iter().map(|r| r.effects.total)),
    };

    let undefined = rows.iter().filter(|r| !r.effects.is_defined()).count();
    if undefined > 0 {
        debug!("{} groups have undefined effects", undefined);
    }

    rows.push(ResultRow {
        label: RowLabel::Total,
        sums: totals,
        ratios: Ratios {
            base_pop_share: ratio(totals.base_pop, totals.base_pop),
            curr_pop_share: ratio(totals.curr_pop, totals.curr_pop),
            base_rate: overall_base_rate,
            curr_rate: overall_curr_rate,
        },
        effects,
        combination: None,
    });

    ResultTable {
        dimensions: aggregation.dimensions.clone(),
        measures: measures.clone(),
        rows,
    }
}
