//! Fixed names and runtime settings.
//!
//! Runtime settings come from the environment (after `.env` is loaded):
//!
//! | Variable                         | Default |
//! |----------------------------------|---------|
//! | `REVSPLIT_PORT`                  | 3000    |
//! | `REVSPLIT_MAX_UPLOAD_MB`         | 50      |
//! | `REVSPLIT_ORIGINAL_PREVIEW_ROWS` | 5       |
//! | `REVSPLIT_SUMMARY_PREVIEW_ROWS`  | 20      |

use std::str::FromStr;

use crate::error::ConfigError;

/// Name given to the downloaded workbook.
pub const OUTPUT_FILE_NAME: &str = "reservation_revenue_summary.xlsx";

/// MIME type of the downloaded workbook.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 50;
pub const DEFAULT_ORIGINAL_PREVIEW_ROWS: usize = 5;
pub const DEFAULT_SUMMARY_PREVIEW_ROWS: usize = 20;

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    /// Request body limit, in megabytes.
    pub max_upload_mb: usize,
    /// Rows of the original table shown in a preview.
    pub original_preview_rows: usize,
    /// Rows of the summary shown in a preview.
    pub summary_preview_rows: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
            original_preview_rows: DEFAULT_ORIGINAL_PREVIEW_ROWS,
            summary_preview_rows: DEFAULT_SUMMARY_PREVIEW_ROWS,
        }
    }
}

impl ServerConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            port: read(&lookup, "REVSPLIT_PORT", defaults.port)?,
            max_upload_mb: read(&lookup, "REVSPLIT_MAX_UPLOAD_MB", defaults.max_upload_mb)?,
            original_preview_rows: read(
                &lookup,
                "REVSPLIT_ORIGINAL_PREVIEW_ROWS",
                defaults.original_preview_rows,
            )?,
            summary_preview_rows: read(
                &lookup,
                "REVSPLIT_SUMMARY_PREVIEW_ROWS",
                defaults.summary_preview_rows,
            )?,
        })
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Body limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

fn read<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.clone(),
            message: e.to_string(),
        }),
    }
}
