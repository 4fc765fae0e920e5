//! Workbook export and browser download.

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, File, HtmlAnchorElement, Url};

use super::upload::{post_file, server_error};
use crate::types::{AppError, AppResult};

/// Delay before the object URL is revoked. It must outlive the click that
/// starts the download.
pub const REVOKE_DELAY_MS: u32 = 1_000;

/// Re-upload the file to the export endpoint and return the workbook bytes.
pub async fn export_workbook(file: &File, backend_url: &str) -> AppResult<Vec<u8>> {
    let url = format!("{}/api/export", backend_url);
    let response = post_file(&url, file).await.map_err(AppError::Network)?;

    if !response.ok() {
        return Err(AppError::Download(server_error(response).await));
    }

    response
        .binary()
        .await
        .map_err(|e| AppError::Decode(e.to_string()))
}

/// Hand `bytes` to the browser as a file download.
pub fn trigger_download(bytes: &[u8], file_name: &str, mime: &str) -> AppResult<()> {
    let js_error = |e: wasm_bindgen::JsValue| AppError::Download(format!("{:?}", e));

    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;

    let url = Url::create_object_url_with_blob(&blob).map_err(js_error)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| AppError::Download("No document available".to_string()))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| AppError::Download("Could not create link".to_string()))?;

    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    schedule_revoke(url, REVOKE_DELAY_MS);
    Ok(())
}

fn schedule_revoke(url: String, delay_ms: u32) {
    Timeout::new(delay_ms, move || {
        if let Err(e) = Url::revoke_object_url(&url) {
            log::warn!("Could not revoke {}: {:?}", url, e);
        }
    })
    .forget();
}
