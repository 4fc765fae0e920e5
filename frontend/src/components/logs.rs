//! Real-time log streaming using Server-Sent Events (SSE).
//!
//! Connects to the backend's `/api/logs` endpoint and displays
//! processing logs in real-time with auto-scroll support.

use leptos::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventSource, MessageEvent};

use crate::{LogEntry, LogLevel, BACKEND_URL, MAX_LOG_ENTRIES};

/// Request animation frame helper for smooth scrolling
fn request_animation_frame(f: impl FnOnce() + 'static) {
    let closure = Closure::once(f);
    if let Some(window) = web_sys::window() {
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

/// Current local time as HH:MM:SS.
pub fn now_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Append an entry, dropping the oldest past [`MAX_LOG_ENTRIES`].
pub fn push_log(set_logs: WriteSignal<Vec<LogEntry>>, entry: LogEntry) {
    set_logs.update(|logs| {
        logs.push(entry);
        if logs.len() > MAX_LOG_ENTRIES {
            logs.remove(0);
        }
    });
}

/// Record a log raised by the frontend itself.
pub fn add_log(set_logs: WriteSignal<Vec<LogEntry>>, level: LogLevel, message: &str) {
    push_log(set_logs, LogEntry::new(level, message, now_timestamp()));
    log::info!("{}", message);
}

/// Start SSE connection to receive real-time logs
/// Should be called ONCE at app startup
pub fn init_sse_logs(set_logs: WriteSignal<Vec<LogEntry>>) {
    let sse_url = format!("{}/api/logs", BACKEND_URL);

    let event_source = match EventSource::new(&sse_url) {
        Ok(es) => es,
        Err(e) => {
            log::error!("Failed to create EventSource: {:?}", e);
            return;
        }
    };

    let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Some(data) = event.data().as_string() {
            if let Some(entry) = LogEntry::from_sse(&data, now_timestamp()) {
                push_log(set_logs, entry);
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    event_source.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();

    let onopen = Closure::wrap(Box::new(move |_: web_sys::Event| {
        log::info!("📡 SSE connected to logs stream");
    }) as Box<dyn FnMut(web_sys::Event)>);

    event_source.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    onopen.forget();

    let onerror = Closure::wrap(Box::new(move |_: web_sys::Event| {
        log::warn!("SSE connection error - will auto-reconnect");
    }) as Box<dyn FnMut(web_sys::Event)>);

    event_source.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    // Lives for the whole session.
    std::mem::forget(event_source);

    log::info!("📡 SSE log stream initialized");
}

/// Real-time logs panel component (display only, SSE is initialized elsewhere)
#[component]
pub fn LogsPanel(
    logs: ReadSignal<Vec<LogEntry>>,
    set_logs: WriteSignal<Vec<LogEntry>>,
) -> impl IntoView {
    let logs_container = create_node_ref::<leptos::html::Div>();

    // Auto-scroll to bottom when logs change
    create_effect(move |_| {
        let _ = logs.get();

        if let Some(container) = logs_container.get() {
            request_animation_frame(move || {
                container.set_scroll_top(container.scroll_height());
            });
        }
    });

    view! {
        <div class="logs-panel">
            <div class="logs-header">
                <span class="logs-title">"📋 Processing Logs"</span>
                <button
                    class="logs-clear"
                    on:click=move |_| set_logs.set(vec![])
                >
                    "Clear"
                </button>
            </div>
            <div class="logs-content" node_ref=logs_container>
                <For
                    each=move || logs.get().into_iter().enumerate()
                    key=|(i, entry)| (*i, entry.timestamp.clone())
                    children=move |(_, entry)| {
                        let padding = format!("padding-left: {}em", entry.indent as f32 * 1.5);
                        view! {
                            <div class=format!("log-entry {}", entry.level.css_class()) style=padding>
                                <span class="log-time">"[" {entry.timestamp.clone()} "] "</span>
                                {entry.message.clone()}
                            </div>
                        }
                    }
                />
            </div>
        </div>
    }
}
