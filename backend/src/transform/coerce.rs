//! Cell coercions applied by the summary transform.
//!
//! - [`to_date_serial`] - any date-like cell to a day count since 1899-12-30
//! - [`to_revenue`] - any cell to a number, zero when it is not one
//!
//! Neither function fails: a value that cannot be read becomes blank
//! (dates) or zero (revenue).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::Cell;

/// Day 0 of the spreadsheet serial date system.
pub const SERIAL_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1899, 12, 30) {
    Some(date) => date,
    None => panic!("invalid serial epoch"),
};

/// Date-time layouts, year first. Only tried when the text opens with a
/// four digit year; chrono's `%Y` would otherwise read "03" as year 3.
const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Day-before-month layouts. Two digit years come first: `%y` rejects
/// "2024" but `%Y` accepts "24".
const DAY_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d %B %Y %H:%M",
];

const DAY_FIRST_DATE_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%d %B %Y",
];

/// Month-first layouts, only reached when no day-first reading exists
/// (e.g. "12/25/2024").
const MONTH_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const MONTH_FIRST_DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%B %d %Y",
    "%B %d, %Y",
];

/// Parse free text as a date, reading ambiguous numeric dates day first.
pub fn parse_day_first(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(dt) = parse_compact(text) {
        return Some(dt);
    }

    let iso = if starts_with_year(text) {
        parse_with(text, ISO_DATETIME_FORMATS, ISO_DATE_FORMATS).or_else(|| parse_offset(text))
    } else {
        None
    };

    iso.or_else(|| parse_with(text, DAY_FIRST_DATETIME_FORMATS, DAY_FIRST_DATE_FORMATS))
        .or_else(|| parse_with(text, MONTH_FIRST_DATETIME_FORMATS, MONTH_FIRST_DATE_FORMATS))
}

fn parse_with(
    text: &str,
    datetime_formats: &[&str],
    date_formats: &[&str],
) -> Option<NaiveDateTime> {
    datetime_formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            date_formats.iter().find_map(|fmt| {
                NaiveDate::parse_from_str(text, fmt)
                    .ok()
                    .map(|d| d.and_time(NaiveTime::MIN))
            })
        })
}

/// `YYYYMMDD`, eight digits and nothing else.
fn parse_compact(text: &str) -> Option<NaiveDateTime> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y%m%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// RFC 3339 timestamps with `Z` or a numeric offset. The wall-clock
/// date in the stated offset is kept.
fn parse_offset(text: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.naive_local())
}

fn starts_with_year(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && !bytes[4].is_ascii_digit()
}

/// Whole days between `dt` and the serial epoch. The time of day is
/// dropped, so the count is truncated rather than rounded.
pub fn serial_from_datetime(dt: &NaiveDateTime) -> i64 {
    dt.date().signed_duration_since(SERIAL_EPOCH).num_days()
}

/// Convert a cell to its serial day count.
///
/// Numbers are taken to be serials already, which keeps the transform
/// stable when applied to its own output.
pub fn to_date_serial(cell: &Cell) -> Cell {
    match cell {
        Cell::Date(dt) => Cell::Int(serial_from_datetime(dt)),
        Cell::Int(n) => Cell::Int(*n),
        Cell::Float(f) => serial_from_float(*f),
        Cell::Text(s) => {
            if let Some(dt) = parse_day_first(s) {
                Cell::Int(serial_from_datetime(&dt))
            } else {
                match parse_number(s) {
                    Some(f) => serial_from_float(f),
                    None => Cell::Empty,
                }
            }
        }
        Cell::Bool(_) | Cell::Empty => Cell::Empty,
    }
}

fn serial_from_float(f: f64) -> Cell {
    if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Cell::Int(f.floor() as i64)
    } else {
        Cell::Empty
    }
}

/// Convert a cell to a revenue amount. Always returns [`Cell::Float`].
pub fn to_revenue(cell: &Cell) -> Cell {
    let amount = match cell {
        Cell::Int(n) => *n as f64,
        Cell::Float(f) => *f,
        Cell::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Cell::Text(s) => parse_number(s).unwrap_or(0.0),
        Cell::Date(_) | Cell::Empty => 0.0,
    };
    Cell::Float(if amount.is_finite() { amount } else { 0.0 })
}

/// Decimal or scientific notation, surrounding whitespace ignored.
/// Thousands separators and currency symbols are not accepted.
fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|f| f.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_epoch_is_serial_zero() {
        assert_eq!(to_date_serial(&Cell::from("30/12/1899")), Cell::Int(0));
    }

    #[test]
    fn test_first_of_january_1900_is_two() {
        assert_eq!(to_date_serial(&Cell::from("01/01/1900")), Cell::Int(2));
        assert_eq!(to_date_serial(&Cell::from("1900-01-01")), Cell::Int(2));
        assert_eq!(to_date_serial(&Cell::Date(date(1900, 1, 1))), Cell::Int(2));
    }

    #[test]
    fn test_ambiguous_dates_read_day_first() {
        assert_eq!(parse_day_first("03/04/2024"), Some(date(2024, 4, 3)));
        assert_eq!(parse_day_first("03-04-2024"), Some(date(2024, 4, 3)));
        assert_eq!(parse_day_first("03.04.2024"), Some(date(2024, 4, 3)));
    }

    #[test]
    fn test_month_first_only_when_day_first_impossible() {
        assert_eq!(parse_day_first("12/25/2024"), Some(date(2024, 12, 25)));
        assert_eq!(parse_day_first("Mar 4, 2024"), Some(date(2024, 3, 4)));
    }

    #[test]
    fn test_two_digit_years() {
        assert_eq!(parse_day_first("03/04/24"), Some(date(2024, 4, 3)));
        assert_eq!(parse_day_first("03-Apr-24"), Some(date(2024, 4, 3)));
    }

    #[test]
    fn test_iso_and_named_month_forms() {
        assert_eq!(parse_day_first("2024-03-04"), Some(date(2024, 3, 4)));
        assert_eq!(parse_day_first(" 4 March 2024 "), Some(date(2024, 3, 4)));
        assert_eq!(parse_day_first("04-Mar-2024"), Some(date(2024, 3, 4)));
        assert_eq!(
            parse_day_first("2024-03-04T15:30:00"),
            date(2024, 3, 4).date().and_hms_opt(15, 30, 0)
        );
    }

    #[test]
    fn test_known_serial() {
        // 2024-01-01 is serial 45292 in spreadsheet applications.
        assert_eq!(to_date_serial(&Cell::from("01/01/2024")), Cell::Int(45292));
    }

    #[test]
    fn test_time_of_day_is_truncated() {
        let evening = date(2024, 1, 1).date().and_hms_opt(23, 59, 59).unwrap();
        assert_eq!(to_date_serial(&Cell::Date(evening)), Cell::Int(45292));
        assert_eq!(to_date_serial(&Cell::from("01/01/2024 18:45")), Cell::Int(45292));
    }

    #[test]
    fn test_unparseable_dates_become_empty() {
        assert_eq!(to_date_serial(&Cell::from("not a date")), Cell::Empty);
        assert_eq!(to_date_serial(&Cell::from("31/02/2024")), Cell::Empty);
        assert_eq!(to_date_serial(&Cell::Empty), Cell::Empty);
        assert_eq!(to_date_serial(&Cell::Bool(true)), Cell::Empty);
        assert_eq!(to_date_serial(&Cell::Float(f64::NAN)), Cell::Empty);
    }

    #[test]
    fn test_numeric_dates_are_already_serials() {
        assert_eq!(to_date_serial(&Cell::Int(45292)), Cell::Int(45292));
        assert_eq!(to_date_serial(&Cell::Float(45292.75)), Cell::Int(45292));
        assert_eq!(to_date_serial(&Cell::from("45292")), Cell::Int(45292));
    }

    #[test]
    fn test_revenue_coercion() {
        assert_eq!(to_revenue(&Cell::from("abc")), Cell::Float(0.0));
        assert_eq!(to_revenue(&Cell::from("12.5")), Cell::Float(12.5));
        assert_eq!(to_revenue(&Cell::from(" 200 ")), Cell::Float(200.0));
        assert_eq!(to_revenue(&Cell::Empty), Cell::Float(0.0));
        assert_eq!(to_revenue(&Cell::Int(7)), Cell::Float(7.0));
        assert_eq!(to_revenue(&Cell::Float(-3.25)), Cell::Float(-3.25));
        assert_eq!(to_revenue(&Cell::from("1e3")), Cell::Float(1000.0));
    }

    #[test]
    fn test_revenue_rejects_formatted_and_non_finite() {
        assert_eq!(to_revenue(&Cell::from("1,200.00")), Cell::Float(0.0));
        assert_eq!(to_revenue(&Cell::from("AED 50")), Cell::Float(0.0));
        assert_eq!(to_revenue(&Cell::from("inf")), Cell::Float(0.0));
        assert_eq!(to_revenue(&Cell::Float(f64::NAN)), Cell::Float(0.0));
        assert_eq!(to_revenue(&Cell::Date(date(2024, 1, 1))), Cell::Float(0.0));
    }

    #[test]
    fn test_compact_dates() {
        assert_eq!(parse_day_first("20240403"), Some(date(2024, 4, 3)));
        assert_eq!(to_date_serial(&Cell::from("20240403")), Cell::Int(45385));
        assert_eq!(to_date_serial(&Cell::from(" 20240403 ")), Cell::Int(45385));
    }

    #[test]
    fn test_numeric_text_that_is_not_a_compact_date_stays_a_serial() {
        // Month 13 cannot be a date, so the number is taken as a serial.
        assert_eq!(to_date_serial(&Cell::from("20241301")), Cell::Int(20241301));
        assert_eq!(to_date_serial(&Cell::from("45385")), Cell::Int(45385));
    }

    #[test]
    fn test_timestamps_with_offsets() {
        let expected = Cell::Int(45385);
        assert_eq!(to_date_serial(&Cell::from("2024-04-03T10:15:00Z")), expected);
        assert_eq!(to_date_serial(&Cell::from("2024-04-03T10:15:00+04:00")), expected);
        assert_eq!(to_date_serial(&Cell::from("2024-04-03T10:15:00.123Z")), expected);
        assert_eq!(to_date_serial(&Cell::from("2024-04-03T23:30:00-05:00")), expected);
    }

    #[test]
    fn test_coercions_are_stable() {
        let serial = to_date_serial(&Cell::from("15/08/2023"));
        assert_eq!(to_date_serial(&serial), serial);

        let amount = to_revenue(&Cell::from("99.9"));
        assert_eq!(to_revenue(&amount), amount);
    }
}
