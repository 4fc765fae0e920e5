//! Common types used across the frontend application.
//!
//! # Categories
//!
//! - **Log Types** - Real-time log streaming
//! - **API Types** - Backend response structures
//! - **Error Types** - Frontend error handling

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// =============================================================================
// Log Types
// =============================================================================

/// Log severity level.
///
/// Matches the backend's log levels for SSE streaming.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            LogLevel::Info => "log-info",
            LogLevel::Success => "log-success",
            LogLevel::Warning => "log-warning",
            LogLevel::Error => "log-error",
        }
    }
}

/// A single log entry, from the backend or raised locally.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth sent by the backend
    pub indent: u8,
    /// Timestamp string (HH:MM:SS)
    pub timestamp: String,
}

/// Wire shape of a backend log entry.
#[derive(Deserialize)]
struct WireLogEntry {
    level: LogLevel,
    message: String,
    #[serde(default)]
    indent: u8,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            indent: 0,
            timestamp: timestamp.into(),
        }
    }

    /// Parse one SSE payload. Unknown shapes are ignored.
    pub fn from_sse(json: &str, timestamp: impl Into<String>) -> Option<Self> {
        let wire: WireLogEntry = serde_json::from_str(json).ok()?;
        Some(Self {
            level: wire.level,
            message: wire.message,
            indent: wire.indent,
            timestamp: timestamp.into(),
        })
    }
}

// =============================================================================
// API Response Types
// =============================================================================

/// Leading rows of a table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePreview {
    pub columns: Vec<String>,
    /// Cells as JSON: null, number, boolean or string
    pub rows: Vec<Vec<Value>>,
    pub total_rows: usize,
}

/// How the backend read the upload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub format: String,
    pub sheet: Option<String>,
    pub encoding: Option<String>,
    pub delimiter: Option<String>,
    pub row_count: usize,
    pub columns: Vec<String>,
}

/// Metadata about the split.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub source: SourceInfo,
    pub download_name: String,
    pub row_count: usize,
}

/// Response from the backend preview endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub job_id: String,
    /// "ready" on success
    pub status: String,
    pub file_name: Option<String>,
    pub original: TablePreview,
    pub summary: TablePreview,
    pub metadata: ResponseMetadata,
}

/// Error body returned by the backend.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
#[derive(Clone, Debug, PartialEq)]
pub enum AppError {
    /// Preview upload failed.
    Upload(String),
    /// Workbook download failed.
    Download(String),
    /// Network/HTTP error.
    Network(String),
    /// Response could not be read.
    Decode(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Upload(msg) => write!(f, "Upload error: {}", msg),
            AppError::Download(msg) => write!(f, "Download error: {}", msg),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Decode(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;
