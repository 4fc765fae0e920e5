//! HTTP upload of a spreadsheet to the backend preview endpoint.

use gloo_net::http::{Request, Response};
use web_sys::{File, FormData};

use crate::types::{AppError, AppResult, ErrorBody, PreviewResponse};

/// Upload a spreadsheet and get both table previews back.
pub async fn preview_workbook(file: &File, backend_url: &str) -> AppResult<PreviewResponse> {
    let url = format!("{}/api/preview", backend_url);
    let response = post_file(&url, file).await.map_err(AppError::Upload)?;

    if !response.ok() {
        return Err(AppError::Upload(server_error(response).await));
    }

    response
        .json::<PreviewResponse>()
        .await
        .map_err(|e| AppError::Decode(e.to_string()))
}

/// POST `file` as the `file` multipart field.
pub(crate) async fn post_file(url: &str, file: &File) -> Result<Response, String> {
    let form_data = FormData::new().map_err(|e| format!("Failed to create FormData: {:?}", e))?;

    form_data
        .append_with_blob_and_filename("file", file, &file.name())
        .map_err(|e| format!("Failed to append file: {:?}", e))?;

    let request = Request::post(url)
        .body(form_data)
        .map_err(|e| format!("Failed to build request: {}", e))?;

    request
        .send()
        .await
        .map_err(|e| format!("HTTP request failed: {}", e))
}

/// Message of a non-2xx response: the backend's `error` field when present.
pub(crate) async fn server_error(response: Response) -> String {
    let status = response.status();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    error_message(status, &text)
}

fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => format!("Server error ({}): {}", status, body),
    }
}
