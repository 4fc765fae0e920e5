//! Fixed column lists of the reservation revenue summary.

/// Date columns converted to spreadsheet serial day counts.
pub const DATE_COLUMNS: [&str; 3] = ["Arrival", "Departure", "Booking Date"];

/// Revenue columns coerced to numbers, zero on failure.
pub const REVENUE_COLUMNS: [&str; 10] = [
    "Base Revenue",
    "Total Revenue",
    "Room Revenue",
    "SC on Room Revenue",
    "VAT on Room Rev",
    "VAT on SC",
    "Cleaning Fees Without VAT",
    "VAT on Cleaning Fees",
    "Tourism Dirham Fees",
    "Cleaning Fees",
];

/// Source label renamed before selection.
pub const CHANNEL_COLUMN: &str = "Channel";

/// Label `Channel` is renamed to.
pub const SUB_CHANNEL_COLUMN: &str = "Sub Channel";

/// Summary columns, in output order. Absent columns are skipped.
pub const SUMMARY_COLUMNS: [&str; 17] = [
    "Reservation Number",
    "Apartment",
    "Guest Name",
    SUB_CHANNEL_COLUMN,
    "Arrival",
    "Departure",
    "Booking Date",
    "Base Revenue",
    "Total Revenue",
    "Room Revenue",
    "SC on Room Revenue",
    "VAT on Room Rev",
    "VAT on SC",
    "Cleaning Fees Without VAT",
    "VAT on Cleaning Fees",
    "Tourism Dirham Fees",
    "Cleaning Fees",
];

/// Human-readable listing of the fixed columns, for the CLI.
pub fn columns_description() -> String {
    let mut out = String::new();
    out.push_str("Date columns (converted to day count since 1899-12-30, unparseable -> blank):\n");
    for name in DATE_COLUMNS {
        out.push_str(&format!("  - {}\n", name));
    }
    out.push_str("\nRevenue columns (converted to numbers, unparseable -> 0):\n");
    for name in REVENUE_COLUMNS {
        out.push_str(&format!("  - {}\n", name));
    }
    out.push_str(&format!(
        "\nRenamed: {} -> {}\n",
        CHANNEL_COLUMN, SUB_CHANNEL_COLUMN
    ));
    out.push_str("\nSummary sheet columns (in order, when present):\n");
    for (i, name) in SUMMARY_COLUMNS.iter().enumerate() {
        out.push_str(&format!("  [{:2}] {}\n", i + 1, name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converted_columns_are_all_in_summary() {
        for name in DATE_COLUMNS.iter().chain(REVENUE_COLUMNS.iter()) {
            assert!(SUMMARY_COLUMNS.contains(name), "{} missing", name);
        }
    }

    #[test]
    fn test_description_lists_everything() {
        let text = columns_description();
        assert!(text.contains("Booking Date"));
        assert!(text.contains("Tourism Dirham Fees"));
        assert!(text.contains("Channel -> Sub Channel"));
        assert!(text.contains("[17] Cleaning Fees"));
    }
}
