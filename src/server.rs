//! HTTP API over the summarisation pipeline.
//!
//! ```text
//! GET  /api/health     → {"status":"ok","message":…}
//! POST /api/summarize  → multipart: file | pdf_url, max_tokens, temperature,
//!                        summary_style, output_language
//! ```
//!
//! Every pipeline error is converted here, exactly once, into the JSON error
//! shape of [`ErrorResponse`] with a status that separates client mistakes
//! (4xx) from upstream or server trouble (5xx).

use crate::error::SummarizeError;
use crate::request::{SummarizeForm, UploadedFile};
use crate::response::{ErrorResponse, SummaryResponse};
use crate::summarize::Summarizer;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Room for multipart boundaries and the small text fields on top of the
/// upload limit.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Build the application router.
pub fn router(summarizer: Arc<Summarizer>) -> Router {
    let body_limit = summarizer.config().max_upload_bytes + MULTIPART_OVERHEAD;
    Router::new()
        .route("/api/health", get(health))
        .route("/api/summarize", post(summarize_endpoint))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(summarizer)
}

/// Serve the API on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, summarizer: Arc<Summarizer>) -> std::io::Result<()> {
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(summarizer))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok", "message": "Backend is running"}))
}

async fn summarize_endpoint(
    State(summarizer): State<Arc<Summarizer>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let limit = summarizer.config().max_upload_bytes + MULTIPART_OVERHEAD;
    let form = match multipart {
        Ok(multipart) => read_form(multipart, limit).await,
        Err(rejection) => Err(SummarizeError::Validation(format!(
            "Expected a multipart/form-data body: {}",
            rejection.body_text()
        ))),
    };

    let result = match form {
        Ok(form) => summarizer.summarize_form(form).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(result) => (StatusCode::OK, Json(SummaryResponse::from(result))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Collect the known multipart fields; anything else is ignored.
async fn read_form(mut multipart: Multipart, limit: usize) -> Result<SummarizeForm, SummarizeError> {
    let to_err = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            SummarizeError::RequestTooLarge { limit }
        } else {
            SummarizeError::Validation(format!("Malformed multipart body: {}", e.body_text()))
        }
    };

    let mut form = SummarizeForm::default();
    while let Some(field) = multipart.next_field().await.map_err(to_err)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(to_err)?;
                // Browsers send an empty part for an untouched file input.
                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.file = Some(UploadedFile { filename, bytes });
            }
            "pdf_url" => form.pdf_url = Some(field.text().await.map_err(to_err)?),
            "max_tokens" => form.max_tokens = Some(field.text().await.map_err(to_err)?),
            "temperature" => form.temperature = Some(field.text().await.map_err(to_err)?),
            "summary_style" => form.summary_style = Some(field.text().await.map_err(to_err)?),
            "output_language" => {
                form.output_language = Some(field.text().await.map_err(to_err)?)
            }
            _ => {}
        }
    }
    Ok(form)
}

/// HTTP status for each error variant.
pub fn status_for(err: &SummarizeError) -> StatusCode {
    match err {
        SummarizeError::Validation(_) => StatusCode::BAD_REQUEST,
        SummarizeError::FileTooLarge { .. } | SummarizeError::RequestTooLarge { .. } => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        SummarizeError::NotAPdf { .. }
        | SummarizeError::ExtractionFailed { .. }
        | SummarizeError::PasswordRequired
        | SummarizeError::NoPages
        | SummarizeError::EmptyDocument { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SummarizeError::FetchFailed { .. } | SummarizeError::GenerationFailed { .. } => {
            StatusCode::BAD_GATEWAY
        }
        SummarizeError::FetchTimeout { .. } | SummarizeError::GenerationTimeout { .. } => {
            StatusCode::GATEWAY_TIMEOUT
        }
        SummarizeError::ProviderNotConfigured { .. } | SummarizeError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(err: &SummarizeError) -> Response {
    let status = status_for(err);
    if status.is_client_error() {
        warn!("request rejected ({}): {}", status, err);
    } else {
        error!("request failed ({}): {}", status, err);
    }
    (status, Json(ErrorResponse::from(err))).into_response()
}
