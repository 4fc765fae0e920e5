//! Application configuration.
//!
//! Hardcoded for development; the backend reads its own settings from
//! the environment.

/// Backend API base URL.
pub const BACKEND_URL: &str = "http://localhost:3000";

/// Maximum file size for upload (in bytes).
///
/// 50 MB, matching the backend's default body limit.
pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

/// Maximum logs to keep in memory.
pub const MAX_LOG_ENTRIES: usize = 100;

/// File extensions offered by the upload picker.
pub const ACCEPTED_FILES: &str = ".xlsx,.xls,.xlsm,.ods,.csv";

/// Name of the downloaded workbook.
pub const DOWNLOAD_FILE_NAME: &str = "reservation_revenue_summary.xlsx";

/// MIME type of the downloaded workbook.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
