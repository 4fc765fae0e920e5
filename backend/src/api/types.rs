//! REST API types for frontend integration.

use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::OUTPUT_FILE_NAME;
use crate::models::TablePreview;
use crate::parser::SourceInfo;
use crate::transform::pipeline::SplitResult;

/// Response sent to the frontend after an upload is split.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Always "ready" on success
    pub status: String,

    /// Name of the uploaded file, when the client sent one
    pub file_name: Option<String>,

    /// Leading rows of the "Original Data" sheet
    pub original: TablePreview,

    /// Leading rows of the summary sheet
    pub summary: TablePreview,

    pub metadata: ResponseMetadata,
}

/// Metadata about the split
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// How the upload was read
    pub source: SourceInfo,

    /// File name the export endpoint will use
    pub download_name: String,

    /// Rows in both sheets
    pub row_count: usize,
}

/// Preview sizes requested by the server config.
#[derive(Debug, Clone, Copy)]
pub struct PreviewRows {
    pub original: usize,
    pub summary: usize,
}

impl PreviewResponse {
    pub fn from_split(result: &SplitResult, file_name: Option<String>, rows: PreviewRows) -> Self {
        PreviewResponse {
            job_id: Uuid::new_v4().to_string(),
            status: "ready".to_string(),
            file_name,
            original: result.original.preview(rows.original),
            summary: result.summary.preview(rows.summary),
            metadata: ResponseMetadata {
                source: result.source.clone(),
                download_name: OUTPUT_FILE_NAME.to_string(),
                row_count: result.summary.len(),
            },
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
    })
}
