//! Backend services.
//!
//! - [`upload`] - Spreadsheet upload for previews
//! - [`download`] - Workbook export and browser download

pub mod download;
pub mod upload;

pub use download::*;
pub use upload::*;
