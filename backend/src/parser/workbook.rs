//! Workbook reading via calamine.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::header_labels;
use crate::error::{DecodeError, DecodeResult};
use crate::models::{Cell, Table};

/// Largest integer an f64 holds exactly.
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// Read the first sheet of a workbook held in memory.
///
/// The first non-empty row is the header; empty rows are skipped.
/// Columns are anchored at column A: when the used range starts further
/// right, the leading columns are kept as empty `Unnamed: <i>` columns.
pub fn read_first_sheet(bytes: &[u8]) -> DecodeResult<(String, Table)> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(DecodeError::NoSheets)?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range
        .rows()
        .filter(|row| row.iter().any(|cell| !is_blank(cell)));

    let header = rows
        .next()
        .ok_or_else(|| DecodeError::NoHeader(sheet_name.clone()))?;

    // calamine ranges begin at the first used cell, not at A1.
    let leading = range.start().map_or(0, |(_, col)| col as usize);

    let labels = std::iter::repeat(String::new())
        .take(leading)
        .chain(header.iter().map(header_text));
    let mut table = Table::new(header_labels(labels));
    for row in rows {
        table.push_row(
            std::iter::repeat(Cell::Empty)
                .take(leading)
                .chain(row.iter().map(data_to_cell))
                .collect(),
        );
    }

    Ok((sheet_name, table))
}

/// Map a calamine cell to a [`Cell`].
///
/// Whole floats become integers, matching how spreadsheet readers show
/// "101" rather than "101.0".
pub fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Bool(b) => Cell::Bool(*b),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < MAX_EXACT_FLOAT_INT {
                Cell::Int(*f as i64)
            } else {
                Cell::Float(*f)
            }
        }
        Data::String(s) => Cell::Text(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::Date(value),
            None => Cell::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_iso(s)
            .map(Cell::Date)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn header_text(data: &Data) -> String {
    data_to_cell(data).display()
}

fn is_blank(data: &Data) -> bool {
    match data {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{Format, Workbook};

    fn workbook_with_blank_rows() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        let sheet = workbook.add_worksheet();
        sheet.set_name("Reservations").unwrap();
        // Row 0 left blank on purpose.
        sheet.write_string(1, 0, " Reservation Number ").unwrap();
        sheet.write_string(1, 1, "Arrival").unwrap();
        sheet.write_string(1, 2, "Base Revenue").unwrap();
        sheet.write_number(2, 0, 101.0).unwrap();
        let arrival = NaiveDate::from_ymd_opt(2024, 4, 3)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        sheet
            .write_datetime_with_format(2, 1, &arrival, &date_format)
            .unwrap();
        sheet.write_number(2, 2, 200.5).unwrap();
        // Row 3 blank, row 4 data.
        sheet.write_number(4, 0, 102.0).unwrap();
        sheet.write_string(4, 1, "05/04/2024").unwrap();

        let second = workbook.add_worksheet();
        second.set_name("Ignored").unwrap();
        second.write_string(0, 0, "Other").unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_reads_first_sheet_only() {
        let (sheet, table) = read_first_sheet(&workbook_with_blank_rows()).unwrap();
        assert_eq!(sheet, "Reservations");
        assert_eq!(
            table.columns(),
            &["Reservation Number", "Arrival", "Base Revenue"]
        );
    }

    #[test]
    fn test_blank_rows_skipped_and_cells_typed() {
        let (_, table) = read_first_sheet(&workbook_with_blank_rows()).unwrap();
        assert_eq!(table.len(), 2);

        assert_eq!(table.cell(0, "Reservation Number"), Some(&Cell::Int(101)));
        assert_eq!(table.cell(0, "Base Revenue"), Some(&Cell::Float(200.5)));
        let expected = NaiveDate::from_ymd_opt(2024, 4, 3)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(table.cell(0, "Arrival"), Some(&Cell::Date(expected)));
        assert_eq!(table.cell(1, "Arrival"), Some(&Cell::from("05/04/2024")));
        assert_eq!(table.cell(1, "Base Revenue"), Some(&Cell::Empty));
    }

    #[test]
    fn test_columns_anchored_at_column_a() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 1, "Reservation Number").unwrap();
        sheet.write_string(0, 3, "Channel").unwrap();
        sheet.write_number(1, 1, 101.0).unwrap();
        sheet.write_string(1, 3, "Airbnb").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let (_, table) = read_first_sheet(&bytes).unwrap();
        assert_eq!(
            table.columns(),
            &["Unnamed: 0", "Reservation Number", "Unnamed: 2", "Channel"]
        );
        assert_eq!(table.rows()[0][0], Cell::Empty);
        assert_eq!(table.cell(0, "Reservation Number"), Some(&Cell::Int(101)));
        assert_eq!(table.cell(0, "Channel"), Some(&Cell::from("Airbnb")));
    }

    #[test]
    fn test_garbage_is_an_error() {
        let result = read_first_sheet(b"PK\x03\x04 definitely not a zip archive");
        assert!(matches!(result, Err(DecodeError::Workbook(_))));
    }

    #[test]
    fn test_empty_sheet_has_no_header() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("Blank").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let result = read_first_sheet(&bytes);
        assert!(matches!(result, Err(DecodeError::NoHeader(name)) if name == "Blank"));
    }

    #[test]
    fn test_data_to_cell() {
        assert_eq!(data_to_cell(&Data::Float(3.0)), Cell::Int(3));
        assert_eq!(data_to_cell(&Data::Float(3.25)), Cell::Float(3.25));
        assert_eq!(data_to_cell(&Data::Bool(true)), Cell::Bool(true));
        assert_eq!(
            data_to_cell(&Data::DateTimeIso("2024-04-03".into())),
            Cell::Date(
                NaiveDate::from_ymd_opt(2024, 4, 3)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            )
        );
        assert_eq!(
            data_to_cell(&Data::DurationIso("PT1H".into())),
            Cell::from("PT1H")
        );
    }
}
