//! Formatting of ratios and effects for display.

use crate::dataset::DimValue;
use crate::decomposition::{ResultRow, ResultTable, TOTAL_LABEL};

/// Decimal places kept for effect values.
pub const EFFECT_DECIMALS: i32 = 4;

/// Render a ratio as a percentage with two decimals, e.g. `0.125` → `"12.50%"`.
///
/// Undefined ratios render as an empty string.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => String::new(),
    }
}

/// Round an effect to [`EFFECT_DECIMALS`] places.
pub fn round_effect(value: Option<f64>) -> Option<f64> {
    let scale = 10f64.powi(EFFECT_DECIMALS);
    value.map(|v| {
        let rounded = (v * scale).round() / scale;
        // Avoid printing "-0"
        if rounded == 0.0 { 0.0 } else { rounded }
    })
}

/// Render a rounded effect; undefined effects render as an empty string.
pub fn format_effect(value: Option<f64>) -> String {
    round_effect(value).map(|v| v.to_string()).unwrap_or_default()
}

fn format_count(value: f64) -> String {
    value.to_string()
}

/// What a column of the rendered table holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Dimension,
    Measure,
    /// Share or rate, rendered as a percentage.
    Percent,
    /// Effect in percentage points.
    Effect,
    Combination,
}

impl ResultTable {
    /// Header names with the kind of each column.
    ///
    /// Shares and rates are named after the measure they derive from.
    pub fn columns(&self) -> Vec<(String, ColumnKind)> {
        let m = &self.measures;
        let mut columns: Vec<(String, ColumnKind)> = self
            .dimensions
            .iter()
            .map(|d| (d.clone(), ColumnKind::Dimension))
            .collect();
        columns.extend(m.names().iter().map(|n| (n.to_string(), ColumnKind::Measure)));
        columns.extend([
            (format!("{} share", m.base_pop), ColumnKind::Percent),
            (format!("{} share", m.curr_pop), ColumnKind::Percent),
            (format!("{} rate", m.base_sub), ColumnKind::Percent),
            (format!("{} rate", m.curr_sub), ColumnKind::Percent),
            ("structural_effect_pp".to_string(), ColumnKind::Effect),
            ("rate_effect_pp".to_string(), ColumnKind::Effect),
            ("total_effect_pp".to_string(), ColumnKind::Effect),
        ]);
        if self.has_combinations() {
            columns.push(("combination".to_string(), ColumnKind::Combination));
        }
        columns
    }

    /// Header row.
    pub fn header(&self) -> Vec<String> {
        self.columns().into_iter().map(|(name, _)| name).collect()
    }

    /// Every row rendered as display strings, aligned with [`ResultTable::header`].
    pub fn display_records(&self) -> Vec<Vec<String>> {
        let with_combination = self.has_combinations();
        self.rows()
            .iter()
            .map(|row| self.display_row(row, with_combination))
            .collect()
    }

    fn display_row(&self, row: &ResultRow, with_combination: bool) -> Vec<String> {
        let mut record: Vec<String> = match row.group_key() {
            Some(key) => key.iter().map(DimValue::to_string).collect(),
            None => vec![TOTAL_LABEL.to_string(); self.dimensions.len()],
        };

        let s = &row.sums;
        record.extend([s.base_pop, s.curr_pop, s.base_sub, s.curr_sub].map(format_count));

        let r = &row.ratios;
        record.extend(
            [r.base_pop_share, r.curr_pop_share, r.base_rate, r.curr_rate].map(format_percent),
        );

        let e = &row.effects;
        record.extend([e.structural, e.rate, e.total].map(format_effect));

        if with_combination {
            record.push(row.combination.map(|c| c.to_string()).unwrap_or_default());
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decomposition::{aggregate, decompose, MeasureColumns};
    use crate::dataset::{Column, Dataset};

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(0.125)), "12.50%");
        assert_eq!(format_percent(Some(1.0)), "100.00%");
        assert_eq!(format_percent(Some(0.0)), "0.00%");
        assert_eq!(format_percent(None), "");
    }

    #[test]
    fn test_round_effect() {
        assert_eq!(round_effect(Some(1.234_567)), Some(1.2346));
        assert_eq!(round_effect(Some(-0.25)), Some(-0.25));
        assert_eq!(round_effect(Some(-0.000_01)), Some(0.0));
        assert_eq!(round_effect(None), None);
        assert_eq!(format_effect(Some(2.0)), "2");
        assert_eq!(format_effect(None), "");
    }

    fn table() -> ResultTable {
        let dataset = Dataset::from_columns(vec![
            Column::categorical("grade", vec!["A".into(), DimValue::Null]),
            Column::numeric("in0", vec![Some(100.0), Some(100.0)]),
            Column::numeric("in1", vec![Some(80.0), Some(120.0)]),
            Column::numeric("ref0", vec![Some(10.0), Some(5.0)]),
            Column::numeric("ref1", vec![Some(12.0), Some(6.0)]),
        ])
        .unwrap();
        let measures = MeasureColumns {
            base_pop: "in0".into(),
            curr_pop: "in1".into(),
            base_sub: "ref0".into(),
            curr_sub: "ref1".into(),
        };
        let agg = aggregate(&dataset, &measures, &["grade"]).unwrap();
        decompose(&agg, &measures, None)
    }

    #[test]
    fn test_header() {
        assert_eq!(
            table().header(),
            vec![
                "grade",
                "in0",
                "in1",
                "ref0",
                "ref1",
                "in0 share",
                "in1 share",
                "ref0 rate",
                "ref1 rate",
                "structural_effect_pp",
                "rate_effect_pp",
                "total_effect_pp",
            ]
        );
    }

    #[test]
    fn test_display_records() {
        let records = table().display_records();
        assert_eq!(records.len(), 3);

        assert_eq!(
            records[0],
            vec![
                "A", "100", "80", "10", "12", "50.00%", "40.00%", "10.00%", "15.00%", "-0.25",
                "2", "1.75",
            ]
        );
        // Null group key renders empty
        assert_eq!(records[1][0], "");
        assert_eq!(records[2][0], TOTAL_LABEL);
        assert_eq!(records[2][5], "100.00%");
        assert_eq!(records[2][11], "1.5");
    }
}
