//! Reservation revenue summary.
//!
//! Turns a raw reservations table into the summary sheet:
//!
//! ```text
//! trim labels → dates to serials → revenue to numbers → Channel → Sub Channel → select
//! ```
//!
//! Rows are never added, removed or reordered.

use super::coerce::{to_date_serial, to_revenue};
use super::columns::{
    CHANNEL_COLUMN, DATE_COLUMNS, REVENUE_COLUMNS, SUB_CHANNEL_COLUMN, SUMMARY_COLUMNS,
};
use crate::models::Table;

/// Build the summary table from an input table.
///
/// The input is left untouched; every step works on a copy. Missing
/// columns are skipped, never synthesized.
pub fn reservation_summary(input: &Table) -> Table {
    let mut table = input.clone();
    table.trim_labels();

    for name in DATE_COLUMNS {
        table.map_column(name, to_date_serial);
    }

    for name in REVENUE_COLUMNS {
        table.map_column(name, to_revenue);
    }

    if table.has_column(CHANNEL_COLUMN) {
        // The renamed Channel wins over an existing Sub Channel.
        table.drop_column(SUB_CHANNEL_COLUMN);
        table.rename_column(CHANNEL_COLUMN, SUB_CHANNEL_COLUMN);
    }

    table.select(&SUMMARY_COLUMNS)
}

/// Whether `Channel` and `Sub Channel` both exist once labels are trimmed.
/// The summary keeps the renamed `Channel`.
pub fn has_channel_conflict(table: &Table) -> bool {
    let trimmed: Vec<&str> = table.columns().iter().map(|c| c.trim()).collect();
    trimmed.contains(&CHANNEL_COLUMN) && trimmed.contains(&SUB_CHANNEL_COLUMN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;
    use chrono::NaiveDate;

    fn reservations() -> Table {
        Table::from_rows(
            [
                " Booking Date",
                "Guest Name",
                "Reservation Number ",
                "Notes",
                "Base Revenue",
                "Departure",
                "Cleaning Fees",
            ],
            vec![
                vec![
                    Cell::from("15/03/2024"),
                    Cell::from("Ada"),
                    Cell::Int(1),
                    Cell::from("late check-in"),
                    Cell::from("450.5"),
                    Cell::from("20/03/2024"),
                    Cell::from("n/a"),
                ],
                vec![
                    Cell::from("garbage"),
                    Cell::from("Grace"),
                    Cell::Int(2),
                    Cell::Empty,
                    Cell::Float(300.0),
                    Cell::Date(
                        NaiveDate::from_ymd_opt(2024, 4, 2)
                            .unwrap()
                            .and_hms_opt(11, 0, 0)
                            .unwrap(),
                    ),
                    Cell::Empty,
                ],
            ],
        )
    }

    #[test]
    fn test_end_to_end_example() {
        let input = Table::from_rows(
            [
                "Reservation Number",
                "Apartment",
                "Arrival",
                "Channel",
                "Base Revenue",
            ],
            vec![vec![
                Cell::Int(101),
                Cell::from("A1"),
                Cell::from("01/01/1900"),
                Cell::from("Airbnb"),
                Cell::from("200"),
            ]],
        );

        let output = reservation_summary(&input);

        assert_eq!(
            output.columns(),
            &[
                "Reservation Number",
                "Apartment",
                "Sub Channel",
                "Arrival",
                "Base Revenue"
            ]
        );
        assert_eq!(
            output.rows()[0],
            vec![
                Cell::Int(101),
                Cell::from("A1"),
                Cell::from("Airbnb"),
                Cell::Int(2),
                Cell::Float(200.0),
            ]
        );
    }

    #[test]
    fn test_priority_order_and_row_count() {
        let input = reservations();
        let output = reservation_summary(&input);

        assert_eq!(
            output.columns(),
            &[
                "Reservation Number",
                "Guest Name",
                "Departure",
                "Booking Date",
                "Base Revenue",
                "Cleaning Fees"
            ]
        );
        assert_eq!(output.len(), input.len());
        assert_eq!(output.cell(0, "Reservation Number"), Some(&Cell::Int(1)));
        assert_eq!(output.cell(1, "Reservation Number"), Some(&Cell::Int(2)));
    }

    #[test]
    fn test_coercions_applied() {
        let output = reservation_summary(&reservations());

        assert_eq!(output.cell(0, "Booking Date"), Some(&Cell::Int(45366)));
        assert_eq!(output.cell(1, "Booking Date"), Some(&Cell::Empty));
        assert_eq!(output.cell(0, "Departure"), Some(&Cell::Int(45371)));
        assert_eq!(output.cell(1, "Departure"), Some(&Cell::Int(45384)));
        assert_eq!(output.cell(0, "Base Revenue"), Some(&Cell::Float(450.5)));
        assert_eq!(output.cell(1, "Base Revenue"), Some(&Cell::Float(300.0)));
        assert_eq!(output.cell(0, "Cleaning Fees"), Some(&Cell::Float(0.0)));
        assert_eq!(output.cell(1, "Cleaning Fees"), Some(&Cell::Float(0.0)));
    }

    #[test]
    fn test_input_not_mutated() {
        let input = reservations();
        let before = input.clone();
        let _ = reservation_summary(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn test_idempotent() {
        let once = reservation_summary(&reservations());
        let twice = reservation_summary(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_channel_renamed() {
        let input = Table::from_rows(["Channel"], vec![vec![Cell::from("Airbnb")]]);
        let output = reservation_summary(&input);
        assert_eq!(output.columns(), &["Sub Channel"]);
        assert_eq!(output.cell(0, "Sub Channel"), Some(&Cell::from("Airbnb")));
    }

    #[test]
    fn test_channel_wins_over_existing_sub_channel() {
        let input = Table::from_rows(
            ["Sub Channel", "Channel"],
            vec![vec![Cell::from("Direct"), Cell::from("Booking.com")]],
        );
        assert!(has_channel_conflict(&input));

        let output = reservation_summary(&input);
        assert_eq!(output.columns(), &["Sub Channel"]);
        assert_eq!(
            output.cell(0, "Sub Channel"),
            Some(&Cell::from("Booking.com"))
        );
    }

    #[test]
    fn test_sub_channel_kept_without_channel() {
        let input = Table::from_rows(["Sub Channel"], vec![vec![Cell::from("Direct")]]);
        assert!(!has_channel_conflict(&input));
        let output = reservation_summary(&input);
        assert_eq!(output.cell(0, "Sub Channel"), Some(&Cell::from("Direct")));
    }

    #[test]
    fn test_missing_columns_tolerated() {
        let input = Table::from_rows(
            ["Apartment", "Owner", "Reservation Number"],
            vec![
                vec![Cell::from("B2"), Cell::from("X"), Cell::Int(7)],
                vec![Cell::from("C3"), Cell::from("Y"), Cell::Int(8)],
            ],
        );
        let output = reservation_summary(&input);
        assert_eq!(output.columns(), &["Reservation Number", "Apartment"]);
        assert_eq!(output.len(), 2);
    }

    #[test]
    fn test_empty_table() {
        let output = reservation_summary(&Table::default());
        assert!(output.columns().is_empty());
        assert!(output.is_empty());
    }
}
