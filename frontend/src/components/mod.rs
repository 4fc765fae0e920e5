//! UI Components for the Revsplit application.
//!
//! # Layout Components
//! - [`Header`] - Top bar with processing status
//! - [`Hero`] - Main title and description
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`UploadSection`] - Spreadsheet upload
//! - [`PreviewSection`] - Both sheet previews, download and cancel
//! - [`LogsPanel`] - Real-time processing logs (SSE)

mod footer;
mod header;
mod hero;
mod logs;
mod preview;
mod upload;

pub use footer::*;
pub use header::*;
pub use hero::*;
pub use logs::*;
pub use preview::*;
pub use upload::*;
