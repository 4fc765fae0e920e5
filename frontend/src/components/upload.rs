//! Spreadsheet upload component.
//!
//! Handles file selection, the preview request and result handling.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, File, HtmlInputElement};

use super::logs::add_log;
use crate::services::preview_workbook;
use crate::{
    AppError, LogEntry, LogLevel, PreviewResponse, ACCEPTED_FILES, BACKEND_URL, MAX_FILE_SIZE,
};

#[component]
pub fn UploadSection(
    set_file: WriteSignal<Option<File>>,
    set_preview: WriteSignal<Option<PreviewResponse>>,
    set_error: WriteSignal<Option<String>>,
    set_is_processing: WriteSignal<bool>,
    set_logs: WriteSignal<Vec<LogEntry>>,
) -> impl IntoView {
    let (is_uploading, set_is_uploading) = create_signal(false);

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // Selecting the same file again must fire `change`.
        input.set_value("");

        set_error.set(None);
        set_preview.set(None);
        set_logs.set(Vec::new());

        if file.size() > MAX_FILE_SIZE as f64 {
            let err = AppError::Upload(format!(
                "{} is larger than {} MB",
                file.name(),
                MAX_FILE_SIZE / (1024 * 1024)
            ));
            set_error.set(Some(err.to_string()));
            return;
        }

        spawn_local(async move {
            set_is_uploading.set(true);
            set_is_processing.set(true);

            add_log(
                set_logs,
                LogLevel::Info,
                &format!("📤 Uploading {}...", file.name()),
            );

            match preview_workbook(&file, BACKEND_URL).await {
                Ok(response) => {
                    add_log(
                        set_logs,
                        LogLevel::Success,
                        &format!(
                            "✅ {} reservations summarized into {} columns",
                            response.metadata.row_count,
                            response.summary.columns.len()
                        ),
                    );
                    set_file.set(Some(file));
                    set_preview.set(Some(response));
                }
                Err(e) => {
                    add_log(set_logs, LogLevel::Error, &format!("❌ {}", e));
                    set_file.set(None);
                    set_error.set(Some(e.to_string()));
                }
            }

            set_is_uploading.set(false);
            set_is_processing.set(false);
        });
    };

    let trigger_file_input = move |_| {
        let input = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("fileInput"));
        if let Some(html_input) = input.as_ref().and_then(|i| i.dyn_ref::<HtmlInputElement>()) {
            html_input.click();
        }
    };

    view! {
        <div
            class="upload-section"
            id="uploadZone"
            on:click=trigger_file_input
        >
            <div class="upload-icon">"📤"</div>
            <div class="upload-text">
                {move || if is_uploading.get() {
                    "⏳ Uploading and processing..."
                } else {
                    "Drop a reservations spreadsheet here"
                }}
            </div>

            <Show
                when=move || !is_uploading.get()
                fallback=|| view! { }
            >
                <div class="upload-hint">"or click to choose a file"</div>
                <div class="upload-hint mt-20">
                    "Excel (.xlsx, .xls, .xlsm), OpenDocument (.ods) or CSV"
                </div>
            </Show>

            <input
                type="file"
                id="fileInput"
                accept=ACCEPTED_FILES
                style="display:none"
                on:change=on_file_change
                on:click=|ev| ev.stop_propagation()
            />

            <Show
                when=move || !is_uploading.get()
                fallback=|| view! { }
            >
                <label for="fileInput" class="upload-button" on:click=|ev| ev.stop_propagation()>
                    "Choose a spreadsheet"
                </label>
            </Show>
        </div>
    }
}
