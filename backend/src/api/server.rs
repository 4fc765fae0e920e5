//! HTTP server for the revsplit API.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                              |
//! |--------|-------------------|------------------------------------------|
//! | GET    | `/health`         | Health check                             |
//! | POST   | `/api/preview`    | Upload a spreadsheet, get both previews  |
//! | POST   | `/api/export`     | Upload a spreadsheet, get the workbook   |
//! | GET    | `/api/logs`       | SSE stream for real-time logs            |
//!
//! Nothing is kept between requests: the export endpoint decodes and
//! transforms the upload again.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, Method},
    response::{sse::Event, IntoResponse, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_success, LOG_BROADCASTER};
use super::types::{PreviewResponse, PreviewRows};
use crate::config::{ServerConfig, OUTPUT_FILE_NAME, XLSX_MIME};
use crate::error::{ServerError, ServerResult};
use crate::transform::pipeline::{split_bytes, SplitResult};

type SharedConfig = Arc<ServerConfig>;

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let port = config.port;
    let max_upload_mb = config.max_upload_mb;
    let app = router(config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Revsplit server running on http://localhost:{}", port);
    println!("   POST /api/preview - Upload spreadsheet, preview both sheets");
    println!("   POST /api/export  - Upload spreadsheet, download workbook");
    println!("   GET  /api/logs    - SSE log stream");
    println!("   GET  /health      - Health check");
    println!();
    println!("📝 Uploads up to {} MB", max_upload_mb);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router.
pub fn router(config: ServerConfig) -> Router {
    // Permissive CORS; the download name is read from Content-Disposition.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let body_limit = config.max_upload_bytes();

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/preview", post(preview_upload))
        .route("/api/export", post(export_upload))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(Arc::new(config))
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "revsplit",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "preview": "POST /api/preview",
            "export": "POST /api/export",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // Lagged receivers skip what they missed.
    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Preview endpoint: both tables, truncated.
async fn preview_upload(
    State(config): State<SharedConfig>,
    multipart: Multipart,
) -> ServerResult<Json<PreviewResponse>> {
    let upload = read_upload(multipart).await?;
    let file_name = upload.file_name.clone();

    let result = run_blocking(move || split_upload(&upload)).await?;

    let rows = PreviewRows {
        original: config.original_preview_rows,
        summary: config.summary_preview_rows,
    };
    Ok(Json(PreviewResponse::from_split(&result, file_name, rows)))
}

/// Export endpoint: the two-sheet workbook as an attachment.
async fn export_upload(multipart: Multipart) -> ServerResult<impl IntoResponse> {
    let upload = read_upload(multipart).await?;

    let bytes = run_blocking(move || {
        let result = split_upload(&upload)?;
        Ok(result.to_workbook()?)
    })
    .await?;

    log_success(format!("Workbook ready: {} ({} bytes)", OUTPUT_FILE_NAME, bytes.len()));

    let headers = [
        (header::CONTENT_TYPE, XLSX_MIME.to_string()),
        (header::CONTENT_DISPOSITION, content_disposition(OUTPUT_FILE_NAME)),
    ];
    Ok((headers, bytes))
}

fn content_disposition(file_name: &str) -> String {
    format!("attachment; filename=\"{}\"", file_name)
}

/// An uploaded file read from the `file` multipart field.
struct Upload {
    bytes: Vec<u8>,
    file_name: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> ServerResult<Upload> {
    let mut upload: Option<Upload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().map(|s| s.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?
                .to_vec();
            upload = Some(Upload { bytes, file_name });
        }
    }

    upload.ok_or_else(|| ServerError::BadRequest("No file provided".to_string()))
}

fn split_upload(upload: &Upload) -> ServerResult<SplitResult> {
    println!("\n{}", "=".repeat(70));
    println!(
        "📄 NEW UPLOAD: {} ({} bytes)",
        upload.file_name.as_deref().unwrap_or("unknown"),
        upload.bytes.len()
    );
    println!("{}\n", "=".repeat(70));

    split_bytes(&upload.bytes, upload.file_name.as_deref()).map_err(|e| {
        log_error(format!("Split error: {}", e));
        ServerError::from(e)
    })
}

/// Run CPU-bound work off the async runtime.
async fn run_blocking<T, F>(work: F) -> ServerResult<T>
where
    F: FnOnce() -> ServerResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServerError::Internal(format!("Worker failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{HeaderMap, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health() {
        let Json(value) = health().await;
        assert_eq!(value["status"], "ok");
        assert_eq!(value["service"], "revsplit");
        assert_eq!(value["endpoints"]["export"], "POST /api/export");
    }

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition(OUTPUT_FILE_NAME),
            "attachment; filename=\"reservation_revenue_summary.xlsx\""
        );
    }

    #[test]
    fn test_split_upload_errors_are_unprocessable() {
        let upload = Upload {
            bytes: Vec::new(),
            file_name: Some("empty.xlsx".to_string()),
        };
        let err = split_upload(&upload).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_run_blocking_returns_value() {
        let upload = Upload {
            bytes: b"Reservation Number,Channel\n1,Airbnb\n".to_vec(),
            file_name: Some("r.csv".to_string()),
        };
        let result = run_blocking(move || split_upload(&upload)).await.unwrap();
        assert_eq!(result.summary.columns(), &["Reservation Number", "Sub Channel"]);
    }

    #[test]
    fn test_router_builds() {
        let _ = router(ServerConfig::default());
    }

    const BOUNDARY: &str = "revsplit-test-boundary";
    const RESERVATIONS_CSV: &[u8] =
        b"Reservation Number,Arrival,Channel,Base Revenue\n1,03/04/2024,Airbnb,200\n";

    fn multipart_request(uri: &str, field: &str, file_name: &str, content: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = router(ServerConfig::default())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, body.to_vec())
    }

    #[tokio::test]
    async fn test_export_returns_workbook_attachment() {
        let request = multipart_request("/api/export", "file", "reservations.csv", RESERVATIONS_CSV);
        let (status, headers, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], XLSX_MIME);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"reservation_revenue_summary.xlsx\""
        );
        assert!(body.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_missing_file_field_is_bad_request() {
        let request = multipart_request("/api/export", "attachment", "reservations.csv", RESERVATIONS_CSV);
        let (status, _, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], "error");
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_unprocessable() {
        let request = multipart_request("/api/export", "file", "invoice.pdf", b"%PDF-1.7 not a sheet");
        let (status, _, body) = send(request).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert!(value["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn test_preview_returns_both_tables() {
        let request = multipart_request("/api/preview", "file", "reservations.csv", RESERVATIONS_CSV);
        let (status, headers, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/json"));

        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], "ready");
        assert_eq!(value["fileName"], "reservations.csv");
        assert_eq!(
            value["summary"]["columns"],
            json!(["Reservation Number", "Sub Channel", "Arrival", "Base Revenue"])
        );
        assert_eq!(value["summary"]["rows"][0][2], 45385);
        assert_eq!(value["summary"]["rows"][0][1], "Airbnb");
        assert_eq!(value["original"]["totalRows"], 1);
    }
}
