//! Two-sheet workbook export.
//!
//! The downloaded file always holds, in this order:
//!
//! | Sheet                         | Content                                  |
//! |-------------------------------|------------------------------------------|
//! | `Original Data`               | decoded upload, labels trimmed           |
//! | `Reservation Revenue Summary` | output of the summary transform          |

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::{ExportError, ExportResult};
use crate::models::{Cell, Table};

/// Name of the sheet holding the upload as read.
pub const ORIGINAL_SHEET: &str = "Original Data";

/// Name of the sheet holding the summary.
pub const SUMMARY_SHEET: &str = "Reservation Revenue Summary";

/// Worksheet capacity, header row included.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

struct Formats {
    header: Format,
    date: Format,
    datetime: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new().set_bold(),
            date: Format::new().set_num_format("yyyy-mm-dd"),
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
        }
    }
}

/// Build the two-sheet workbook in memory.
pub fn workbook_bytes(original: &Table, summary: &Table) -> ExportResult<Vec<u8>> {
    let mut workbook = build_workbook(original, summary)?;
    Ok(workbook.save_to_buffer()?)
}

/// Write the two-sheet workbook to `path`.
pub fn write_workbook(path: &Path, original: &Table, summary: &Table) -> ExportResult<()> {
    let bytes = workbook_bytes(original, summary)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn build_workbook(original: &Table, summary: &Table) -> ExportResult<Workbook> {
    check_size(original)?;
    check_size(summary)?;

    let formats = Formats::new();
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(ORIGINAL_SHEET)?;
    write_table(sheet, original, &formats)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name(SUMMARY_SHEET)?;
    write_table(sheet, summary, &formats)?;

    Ok(workbook)
}

fn check_size(table: &Table) -> ExportResult<()> {
    if table.len() + 1 > MAX_ROWS || table.width() > MAX_COLUMNS {
        return Err(ExportError::TooLarge {
            rows: table.len(),
            columns: table.width(),
        });
    }
    Ok(())
}

/// Header row, then one worksheet row per table row. Blank cells are
/// left unwritten.
fn write_table(sheet: &mut Worksheet, table: &Table, formats: &Formats) -> ExportResult<()> {
    for (col, label) in table.columns().iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, label, &formats.header)?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            write_cell(sheet, row_num, col as u16, cell, formats)?;
        }
    }

    Ok(())
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    formats: &Formats,
) -> ExportResult<()> {
    match cell {
        Cell::Empty => {}
        Cell::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        Cell::Int(i) => {
            sheet.write_number(row, col, *i as f64)?;
        }
        Cell::Float(f) => {
            if f.is_finite() {
                sheet.write_number(row, col, *f)?;
            }
        }
        Cell::Date(dt) => {
            let format = if dt.time() == chrono::NaiveTime::MIN {
                &formats.date
            } else {
                &formats.datetime
            };
            sheet.write_datetime_with_format(row, col, dt, format)?;
        }
        Cell::Text(s) => {
            sheet.write_string(row, col, s)?;
        }
    }
    Ok(())
}
