//! CSV/TSV writer for result tables.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::decomposition::ResultTable;
use crate::error::Result;

/// Options for delimited output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelimitedOptions {
    pub delimiter: u8,
    /// Prefix the output with a UTF-8 byte order mark so spreadsheet
    /// applications detect the encoding.
    pub bom: bool,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            bom: false,
        }
    }
}

impl DelimitedOptions {
    pub fn csv() -> Self {
        Self::default()
    }

    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Self::default()
        }
    }

    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }
}

/// Write the header and display records of `table`.
pub fn write_delimited<W: Write>(table: &ResultTable, mut writer: W, options: &DelimitedOptions) -> Result<()> {
    if options.bom {
        writer
            .write_all(b"\xEF\xBB\xBF")
            .map_err(csv::Error::from)?;
    }

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);

    csv_writer.write_record(table.header())?;
    for record in table.display_records() {
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;

    Ok(())
}
