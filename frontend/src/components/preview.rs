//! Preview of both sheets with the download and cancel controls.

use leptos::*;
use serde_json::Value;
use web_sys::File;

use super::logs::add_log;
use crate::services::{export_workbook, trigger_download};
use crate::{
    LogEntry, LogLevel, PreviewResponse, TablePreview, BACKEND_URL, DOWNLOAD_FILE_NAME, XLSX_MIME,
};

/// Text shown for one JSON cell. Whole numbers print without a fraction.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One table preview.
#[component]
pub fn DataPreview(title: &'static str, table: TablePreview) -> impl IntoView {
    let shown = table.rows.len();
    let total = table.total_rows;
    let header = table
        .columns
        .iter()
        .map(|c| view! { <th>{c.clone()}</th> })
        .collect_view();
    let body = table
        .rows
        .iter()
        .map(|row| {
            let cells = row
                .iter()
                .map(|cell| view! { <td>{format_cell(cell)}</td> })
                .collect_view();
            view! { <tr>{cells}</tr> }
        })
        .collect_view();

    view! {
        <div class="data-preview">
            <div class="data-preview-title">
                {title} " " <span class="data-preview-count">{format!("({} of {} rows)", shown, total)}</span>
            </div>
            <div class="table-wrapper">
                <table class="preview-table">
                    <thead><tr>{header}</tr></thead>
                    <tbody>{body}</tbody>
                </table>
            </div>
        </div>
    }
}

#[component]
pub fn PreviewSection(
    preview: ReadSignal<Option<PreviewResponse>>,
    file: ReadSignal<Option<File>>,
    set_preview: WriteSignal<Option<PreviewResponse>>,
    set_file: WriteSignal<Option<File>>,
    set_error: WriteSignal<Option<String>>,
    set_logs: WriteSignal<Vec<LogEntry>>,
) -> impl IntoView {
    let (is_downloading, set_is_downloading) = create_signal(false);

    // Back to the upload box
    let on_cancel = move |_| {
        log::info!("🚫 Cancelled - back to upload");
        set_preview.set(None);
        set_file.set(None);
        set_error.set(None);
        set_logs.set(vec![]);
    };

    let on_download = move |_| {
        let Some(file) = file.get() else {
            set_error.set(Some("No file to export".to_string()));
            return;
        };

        set_is_downloading.set(true);
        spawn_local(async move {
            add_log(set_logs, LogLevel::Info, "📥 Building workbook...");

            let result = export_workbook(&file, BACKEND_URL)
                .await
                .and_then(|bytes| trigger_download(&bytes, DOWNLOAD_FILE_NAME, XLSX_MIME));

            match result {
                Ok(()) => add_log(
                    set_logs,
                    LogLevel::Success,
                    &format!("✅ Downloaded {}", DOWNLOAD_FILE_NAME),
                ),
                Err(e) => {
                    add_log(set_logs, LogLevel::Error, &format!("❌ {}", e));
                    set_error.set(Some(e.to_string()));
                }
            }
            set_is_downloading.set(false);
        });
    };

    view! {
        <div class="preview-section show" id="previewSection">
            <div class="preview-header">
                <div class="preview-title">
                    "📋 "
                    {move || preview.get().and_then(|p| p.file_name).unwrap_or_else(|| "Upload".to_string())}
                </div>
                <button class="btn btn-secondary" id="cancelBtn" on:click=on_cancel>"Cancel"</button>
            </div>

            {move || preview.get().map(|p| view! {
                <DataPreview title="Original Data" table=p.original/>
                <DataPreview title="Reservation Revenue Summary" table=p.summary/>
            })}

            <div class="preview-footer">
                <div class="preview-cost">
                    <strong>{move || preview.get().map(|p| p.metadata.row_count).unwrap_or(0)}</strong>
                    " reservations"
                </div>
                <button
                    class="btn btn-primary"
                    id="downloadBtn"
                    on:click=on_download
                    disabled=move || is_downloading.get()
                >
                    {move || if is_downloading.get() { "⏳ Preparing..." } else { "Download Excel" }}
                </button>
            </div>
        </div>
    }
}
