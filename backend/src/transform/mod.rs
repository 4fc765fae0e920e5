//! Transformation module.
//!
//! - Columns: fixed date, revenue and output-order lists
//! - Coerce: date serials and revenue numbers
//! - Summary: the reservation revenue summary transform
//! - Pipeline: decode, summarize, export

pub mod coerce;
pub mod columns;
pub mod pipeline;
pub mod summary;

pub use columns::{columns_description, DATE_COLUMNS, REVENUE_COLUMNS, SUMMARY_COLUMNS};
pub use pipeline::{split_bytes, split_file, SplitResult};
pub use summary::{has_channel_conflict, reservation_summary};
