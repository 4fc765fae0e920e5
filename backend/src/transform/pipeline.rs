//! High-level pipeline API: upload in, two tables out.
//!
//! Combines decoding, the summary transform and workbook export.
//!
//! # Example
//!
//! ```rust,ignore
//! use revsplit::transform::pipeline::split_file;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let result = split_file(Path::new("reservations.xlsx"))?;
//!     println!("Summarized {} reservations", result.summary.len());
//!     std::fs::write("reservation_revenue_summary.xlsx", result.to_workbook()?)?;
//!     Ok(())
//! }
//! ```

use std::path::Path;

use super::summary::{has_channel_conflict, reservation_summary};
use crate::api::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::error::PipelineResult;
use crate::export::workbook_bytes;
use crate::models::Table;
use crate::parser::{decode, decode_file, DecodedSheet, SourceInfo};

/// Result of a complete split.
#[derive(Debug, Clone)]
pub struct SplitResult {
    /// Decoded upload, labels trimmed. Becomes the "Original Data" sheet.
    pub original: Table,

    /// Output of the summary transform.
    pub summary: Table,

    /// Decoding metadata
    pub source: SourceInfo,
}

impl SplitResult {
    /// Encode both tables as the downloadable workbook.
    pub fn to_workbook(&self) -> PipelineResult<Vec<u8>> {
        Ok(workbook_bytes(&self.original, &self.summary)?)
    }
}

/// Split uploaded bytes. `file_name` only guides format detection.
pub fn split_bytes(bytes: &[u8], file_name: Option<&str>) -> PipelineResult<SplitResult> {
    log_info("📖 Reading upload...");
    let decoded = decode(bytes, file_name)?;
    Ok(split_decoded(decoded))
}

/// Split a file on disk.
pub fn split_file(path: &Path) -> PipelineResult<SplitResult> {
    log_info(format!("📖 Reading {}...", path.display()));
    let decoded = decode_file(path)?;
    Ok(split_decoded(decoded))
}

fn split_decoded(decoded: DecodedSheet) -> SplitResult {
    let DecodedSheet { table, source } = decoded;
    log_source(&source);

    if has_channel_conflict(&table) {
        log_warning("Both 'Channel' and 'Sub Channel' present; keeping 'Channel' as 'Sub Channel'");
    }

    log_info("⚙️  Building reservation revenue summary...");
    let summary = reservation_summary(&table);
    log_success(format!(
        "{} rows, {} summary columns",
        summary.len(),
        summary.width()
    ));
    for (i, col) in summary.columns().iter().enumerate() {
        log_info_indent(format!("[{:2}] {}", i + 1, col), 1);
    }

    SplitResult {
        original: table,
        summary,
        source,
    }
}

fn log_source(source: &SourceInfo) {
    match &source.sheet {
        Some(sheet) => log_success(format!("Detected {} workbook, sheet '{}'", source.format, sheet)),
        None => log_success(format!("Detected {} file", source.format)),
    }
    if let Some(encoding) = &source.encoding {
        log_success(format!("Detected encoding: {}", encoding));
    }
    if let Some(delimiter) = &source.delimiter {
        log_success(format!("Detected separator: '{}'", delimiter));
    }
    log_success(format!("Read {} rows", source.row_count));

    log_info(format!("📋 Upload has {} columns:", source.columns.len()));
    for (i, col) in source.columns.iter().enumerate() {
        log_info_indent(format!("[{:2}] {}", i + 1, col), 1);
    }
}
