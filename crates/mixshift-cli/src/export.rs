//! Writing the result table to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use mixshift::export::{round_effect, ColumnKind};
use mixshift::{write_delimited, DelimitedOptions, DecompositionResult, ResultTable};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::cli::OutputFormat;

const SHEET_NAME: &str = "decomposition";
const PERCENT_FORMAT: &str = "0.00%";
const EFFECT_FORMAT: &str = "0.0000";
const COUNT_FORMAT: &str = "#,##0.##";

/// Write `result` to `path` in the requested format.
pub fn write_output(
    result: &DecompositionResult,
    path: &Path,
    format: OutputFormat,
    bom: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Csv | OutputFormat::Tsv => {
            let options = if format == OutputFormat::Tsv {
                DelimitedOptions::tsv()
            } else {
                DelimitedOptions::csv()
            }
            .with_bom(bom);
            let mut writer = BufWriter::new(File::create(path)?);
            write_delimited(&result.table, &mut writer, &options)?;
            writer.flush()?;
        }
        OutputFormat::Json => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, result)?;
            writer.flush()?;
        }
        OutputFormat::Xlsx => write_xlsx(&result.table, path)?,
    }
    info!("Wrote {} output to '{}'", format, path.display());
    Ok(())
}

/// Cell formats for one row style.
struct RowFormats {
    text: Format,
    count: Format,
    percent: Format,
    effect: Format,
}

impl RowFormats {
    fn new(bold: bool) -> Self {
        let base = if bold {
            Format::new().set_bold().set_border_top(FormatBorder::Thin)
        } else {
            Format::new()
        };
        Self {
            text: base.clone(),
            count: base.clone().set_num_format(COUNT_FORMAT),
            percent: base.clone().set_num_format(PERCENT_FORMAT),
            effect: base.set_num_format(EFFECT_FORMAT),
        }
    }
}

fn write_number(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
    format: &Format,
) -> Result<(), XlsxError> {
    match value {
        Some(v) => sheet.write_number_with_format(row, col, v, format)?,
        None => sheet.write_blank(row, col, format)?,
    };
    Ok(())
}

/// Write the result table as a single-sheet workbook.
///
/// Shares and rates are stored as fractions with a percent format, effects
/// rounded to four places.
pub fn write_xlsx(table: &ResultTable, path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xD9E1F2))
        .set_border_bottom(FormatBorder::Thin);
    let columns = table.columns();
    for (col, (name, _)) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, name, &header_format)?;
    }

    let plain = RowFormats::new(false);
    let bold = RowFormats::new(true);

    for (index, (row, record)) in table.rows().iter().zip(table.display_records()).enumerate() {
        let r = index as u32 + 1;
        let formats = if row.is_total() { &bold } else { &plain };
        let s = &row.sums;
        let q = &row.ratios;
        let e = &row.effects;
        let numbers = [
            Some(s.base_pop),
            Some(s.curr_pop),
            Some(s.base_sub),
            Some(s.curr_sub),
            q.base_pop_share,
            q.curr_pop_share,
            q.base_rate,
            q.curr_rate,
            round_effect(e.structural),
            round_effect(e.rate),
            round_effect(e.total),
        ];
        let mut numbers = numbers.into_iter();

        for (col, ((_, kind), text)) in columns.iter().zip(record).enumerate() {
            let c = col as u16;
            match kind {
                ColumnKind::Dimension | ColumnKind::Combination => {
                    sheet.write_string_with_format(r, c, text, &formats.text)?;
                }
                ColumnKind::Measure => {
                    write_number(sheet, r, c, numbers.next().flatten(), &formats.count)?
                }
                ColumnKind::Percent => {
                    write_number(sheet, r, c, numbers.next().flatten(), &formats.percent)?
                }
                ColumnKind::Effect => {
                    write_number(sheet, r, c, numbers.next().flatten(), &formats.effect)?
                }
            }
        }
    }

    sheet.set_freeze_panes(1, 0)?;
    sheet.autofit();
    workbook.save(path)?;
    Ok(())
}
