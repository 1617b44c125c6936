//! Input resolution: turn a validated [`InputSource`] into raw PDF bytes.
//!
//! Uploads are already in memory. URLs are downloaded with a bounded timeout
//! and a size cap, and the response must look like a PDF before it is handed
//! to the parser. Nothing touches the file system, so concurrent requests
//! never share a path.

use crate::error::SummarizeError;
use crate::pipeline::validate::has_pdf_signature;
use crate::request::InputSource;
use bytes::Bytes;
use std::time::Duration;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("pdf-summarizer/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client used for URL inputs.
///
/// One client per process keeps a connection pool across requests;
/// `timeout_secs` bounds each whole download.
pub fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, SummarizeError> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| SummarizeError::Internal(format!("Failed to build HTTP client: {e}")))
}

/// Resolve `source` to the PDF bytes it refers to.
pub async fn resolve_input(
    client: &reqwest::Client,
    source: &InputSource,
    timeout_secs: u64,
    max_bytes: usize,
) -> Result<Bytes, SummarizeError> {
    match source {
        InputSource::Upload { filename, bytes } => {
            debug!("Using uploaded file '{}' ({} bytes)", filename, bytes.len());
            Ok(bytes.clone())
        }
        InputSource::Url(url) => download_pdf(client, url, timeout_secs, max_bytes).await,
    }
}

/// Download `url`, enforcing success status, size cap and PDF content.
pub async fn download_pdf(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: u64,
    max_bytes: usize,
) -> Result<Bytes, SummarizeError> {
    info!("Downloading PDF from: {}", url);

    let map_send_err = |e: reqwest::Error| {
        if e.is_timeout() {
            SummarizeError::FetchTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            SummarizeError::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    };

    let mut response = client.get(url).send().await.map_err(map_send_err)?;

    if !response.status().is_success() {
        return Err(SummarizeError::FetchFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    if let Some(len) = response.content_length() {
        if len > max_bytes as u64 {
            return Err(SummarizeError::FileTooLarge {
                size: usize::try_from(len).unwrap_or(usize::MAX),
                max: max_bytes,
            });
        }
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(map_send_err)? {
        if body.len() + chunk.len() > max_bytes {
            return Err(SummarizeError::FileTooLarge {
                size: body.len() + chunk.len(),
                max: max_bytes,
            });
        }
        body.extend_from_slice(&chunk);
    }

    // Some servers label PDFs application/octet-stream; the signature decides then.
    if !content_type.contains("pdf") && !has_pdf_signature(&body) {
        return Err(SummarizeError::NotAPdf {
            source_name: url.to_string(),
        });
    }

    info!("Downloaded {} bytes ({})", body.len(), content_type);
    Ok(Bytes::from(body))
}
