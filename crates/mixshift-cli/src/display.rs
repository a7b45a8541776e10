//! Terminal tables.

use comfy_table::{presets::NOTHING, *};
use mixshift::export::ColumnKind;
use mixshift::{ColumnRoles, ResultTable, TableSchema};

fn styled_table(header: Vec<Cell>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header)
        .set_style(TableComponent::BottomBorder, '─')
        .set_style(TableComponent::MiddleHeaderIntersections, '─')
        .set_style(TableComponent::HeaderLines, '─')
        .set_style(TableComponent::BottomBorderIntersections, '─')
        .set_style(TableComponent::TopBorder, '─')
        .set_style(TableComponent::TopBorderIntersections, '─');
    table
}

fn effect_cell(text: String) -> Cell {
    let color = if text.starts_with('-') {
        Color::Red
    } else if text.is_empty() || text == "0" {
        Color::Reset
    } else {
        Color::Green
    };
    Cell::new(text).fg(color)
}

/// Render the decomposition result; the total row is bold.
pub fn result_table(result: &ResultTable) -> Table {
    let columns = result.columns();
    let header = columns
        .iter()
        .map(|(name, _)| Cell::new(name).add_attribute(Attribute::Bold))
        .collect();
    let mut table = styled_table(header);

    for (row, record) in result.rows().iter().zip(result.display_records()) {
        let cells: Vec<Cell> = record
            .into_iter()
            .zip(&columns)
            .map(|(text, (_, kind))| {
                let cell = match kind {
                    ColumnKind::Effect => effect_cell(text),
                    _ => Cell::new(text),
                };
                if row.is_total() {
                    cell.add_attribute(Attribute::Bold)
                } else {
                    cell
                }
            })
            .collect();
        table.add_row(cells);
    }

    for (index, (_, kind)) in columns.iter().enumerate() {
        if matches!(
            kind,
            ColumnKind::Measure | ColumnKind::Percent | ColumnKind::Effect
        ) {
            if let Some(column) = table.column_mut(index) {
                column.set_cell_alignment(CellAlignment::Right);
            }
        }
    }

    table
}

/// Describe the role each column plays in the decomposition.
pub fn column_role(name: &str, roles: Option<&ColumnRoles>) -> &'static str {
    let Some(roles) = roles else {
        return "";
    };
    let m = &roles.measures;
    if name == m.base_pop {
        "base population"
    } else if name == m.curr_pop {
        "current population"
    } else if name == m.base_sub {
        "base sub-count"
    } else if name == m.curr_sub {
        "current sub-count"
    } else if roles.dimensions.iter().any(|d| d == name) {
        "dimension"
    } else {
        "unused"
    }
}

/// Render the inferred schema with each column's role.
pub fn schema_table(schema: &TableSchema, roles: Option<&ColumnRoles>) -> Table {
    let header = ["#", "Column", "Type", "Nulls", "Distinct", "Role"]
        .into_iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
        .collect();
    let mut table = styled_table(header);

    for column in &schema.columns {
        table.add_row(vec![
            Cell::new(column.position + 1),
            Cell::new(&column.name),
            Cell::new(format!("{:?}", column.inferred_type)),
            Cell::new(column.null_count),
            Cell::new(column.unique_count),
            Cell::new(column_role(&column.name, roles)),
        ]);
    }
    table
}
