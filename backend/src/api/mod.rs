//! HTTP API module.
//!
//! The axum server, its JSON types and the SSE log stream.

pub mod logs;
pub mod server;
pub mod types;

pub use logs::*;
pub use server::{router, start_server};
pub use types::*;
