//! Revsplit - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for uploading a reservations spreadsheet,
//! previewing the revenue summary and downloading the workbook.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (processing status)                                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title, description)                              │
//! │  ├── UploadSection or LogsPanel                             │
//! │  ├── Status message (prompt or error)                       │
//! │  └── PreviewSection (when a preview is loaded)              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Common types (LogEntry, PreviewResponse, etc.)
//! - [`components`] - UI components (Header, Upload, Preview, etc.)
//! - [`services`] - Backend communication (preview, export, download)

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;
use web_sys::File;

// =============================================================================
// Module declarations
// =============================================================================

pub mod components;
pub mod config;
pub mod services;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::*;

pub use types::{
    // Logs
    LogEntry,
    LogLevel,
    // API
    PreviewResponse,
    ResponseMetadata,
    SourceInfo,
    TablePreview,
    // Errors
    AppError,
    AppResult,
};

pub use components::*;

pub use services::*;

/// Prompt shown before anything is uploaded.
pub const EMPTY_PROMPT: &str = "Please upload an Excel file to begin.";

/// Inline message for a failed request.
pub fn failure_message(error: &str) -> String {
    format!("Something went wrong: {}", error)
}

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 Revsplit - Starting Leptos App");

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Reservation Revenue Split"/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    let (file, set_file) = create_signal(None::<File>);
    let (preview, set_preview) = create_signal(None::<PreviewResponse>);
    let (error, set_error) = create_signal(None::<String>);
    let (is_processing, set_is_processing) = create_signal(false);
    let (logs, set_logs) = create_signal(Vec::<LogEntry>::new());

    // Initialize SSE connection ONCE at app startup
    init_sse_logs(set_logs);

    view! {
        <Header is_processing=is_processing/>

        <div class="container">
            <Hero/>

            // Upload box until a preview is loaded
            <Show
                when=move || preview.get().is_none()
                fallback=|| view! { }
            >
                <UploadSection
                    set_file=set_file
                    set_preview=set_preview
                    set_error=set_error
                    set_is_processing=set_is_processing
                    set_logs=set_logs
                />
            </Show>

            <Show
                when=move || !logs.get().is_empty()
                fallback=|| view! { }
            >
                <LogsPanel logs=logs set_logs=set_logs/>
            </Show>

            {move || match (error.get(), preview.get().is_some(), is_processing.get()) {
                (Some(e), _, _) => view! {
                    <div class="error-message">{failure_message(&e)}</div>
                }.into_view(),
                (None, false, false) => view! {
                    <div class="info-message">{EMPTY_PROMPT}</div>
                }.into_view(),
                _ => ().into_view(),
            }}

            <Show
                when=move || preview.get().is_some()
                fallback=|| view! { }
            >
                <PreviewSection
                    preview=preview
                    file=file
                    set_preview=set_preview
                    set_file=set_file
                    set_error=set_error
                    set_logs=set_logs
                />
            </Show>
        </div>

        <Footer/>
    }
}
