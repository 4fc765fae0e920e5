//! Error types for the reservation split pipeline.
//!
//! - [`DecodeError`] - Reading an uploaded spreadsheet or delimited file
//! - [`ExportError`] - Writing the two-sheet workbook
//! - [`PipelineError`] - Top-level orchestration errors
//! - [`ConfigError`] - Invalid environment configuration
//! - [`ServerError`] - HTTP boundary errors
//!
//! Cell-level problems are never errors: the transform coerces them.
//! Everything here is a whole-request failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::api::types::error_response;

// =============================================================================
// Decode Errors
// =============================================================================

/// Errors while turning uploaded bytes into a table.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Nothing was uploaded.
    #[error("File is empty")]
    EmptyFile,

    /// The workbook has no worksheet.
    #[error("Workbook contains no sheets")]
    NoSheets,

    /// The first sheet has no header row.
    #[error("No header row found in sheet '{0}'")]
    NoHeader(String),

    /// calamine could not open or read the workbook.
    #[error("Cannot read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    /// Malformed delimited text.
    #[error("Invalid CSV format: {0}")]
    Csv(#[from] csv::Error),

    /// Text could not be decoded.
    #[error("Failed to decode text: {0}")]
    Encoding(String),

    /// Neither a workbook nor a delimited text file.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing the output workbook.
#[derive(Debug, Error)]
pub enum ExportError {
    /// rust_xlsxwriter rejected a write or the save.
    #[error("Spreadsheet write failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The table does not fit an xlsx worksheet.
    #[error("Table of {rows} rows x {columns} columns exceeds the worksheet limits")]
    TooLarge { rows: usize, columns: usize },

    /// IO error.
    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::transform::pipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Upload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Output could not be written.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Config Errors
// =============================================================================

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("Invalid value '{value}' for {key}: {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Pipeline(PipelineError::Decode(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(error_response(&self.to_string()))).into_response()
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // DecodeError -> PipelineError -> ServerError
        let decode_err = DecodeError::EmptyFile;
        let pipeline_err: PipelineError = decode_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        let server_err: ServerError = pipeline_err.into();
        assert_eq!(server_err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(server_err.to_string().contains("File is empty"));
    }

    #[test]
    fn test_export_error_is_internal() {
        let err: ServerError = PipelineError::from(ExportError::TooLarge {
            rows: 2_000_000,
            columns: 3,
        })
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("2000000 rows"));
    }

    #[test]
    fn test_bad_request_status() {
        let err = ServerError::BadRequest("No file provided".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("No file provided"));
    }

    #[test]
    fn test_config_error_format() {
        let err = ConfigError::InvalidValue {
            key: "REVSPLIT_PORT".into(),
            value: "abc".into(),
            message: "invalid digit found in string".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("REVSPLIT_PORT"));
        assert!(msg.contains("'abc'"));
    }
}
