//! # Revsplit - reservation revenue summaries from spreadsheet exports
//!
//! Revsplit reads a reservations spreadsheet (xlsx, xls, ods or CSV),
//! normalizes its dates and revenue figures, and writes a two-sheet
//! workbook: the original data and a fixed-layout revenue summary.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Upload    │────▶│   Parser    │────▶│  Transform  │────▶│   Export    │
//! │ (xlsx/csv)  │     │ (auto-fmt)  │     │  (summary)  │     │ (2 sheets)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use revsplit::split_file;
//! use std::path::Path;
//!
//! let result = split_file(Path::new("reservations.xlsx")).unwrap();
//! std::fs::write("reservation_revenue_summary.xlsx", result.to_workbook().unwrap()).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Cells, tables and previews
//! - [`parser`] - Workbook and delimited-text decoding
//! - [`transform`] - Coercions, summary and pipeline
//! - [`export`] - Two-sheet xlsx writer
//! - [`config`] - Fixed names and server settings
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Decoding
pub mod parser;

// Transformation
pub mod transform;

// Encoding
pub mod export;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, DecodeError, ExportError, PipelineError, PipelineResult, ServerError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Cell, Table, TablePreview};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{decode, decode_file, DecodedSheet, SourceInfo};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    columns_description, has_channel_conflict, reservation_summary, split_bytes, split_file,
    SplitResult,
};

// =============================================================================
// Re-exports - Export
// =============================================================================

pub use export::{workbook_bytes, write_workbook, ORIGINAL_SHEET, SUMMARY_SHEET};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::{ServerConfig, OUTPUT_FILE_NAME, XLSX_MIME};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
