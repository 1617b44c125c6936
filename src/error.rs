//! Error types for the pdf-summarizer library.
//!
//! Every stage of the pipeline fails with the same [`SummarizeError`] type, so
//! a request is a short chain of `?`-composed steps with a single outcome.
//! Each variant maps to an [`ErrorKind`], the machine-readable category sent
//! to clients alongside the human-readable message: callers branch on
//! [`ErrorKind::is_client_error`] ("fix your input") instead of pattern
//! matching message text ("try again later").

use serde::Serialize;
use thiserror::Error;

/// All errors returned by the summarisation pipeline.
#[derive(Debug, Error)]
pub enum SummarizeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Missing, conflicting, or out-of-range request fields.
    #[error("{0}")]
    Validation(String),

    /// Uploaded file exceeds the configured size limit.
    #[error("File too large: {size} bytes (maximum is {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    /// Request body exceeded the server's limit before it could be read.
    #[error("Request body too large (limit is {limit} bytes)")]
    RequestTooLarge { limit: usize },

    // ── Fetch errors ──────────────────────────────────────────────────────
    /// URL was unreachable or answered with a non-success status.
    #[error("Error downloading PDF from '{url}': {reason}")]
    FetchFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    FetchTimeout { url: String, secs: u64 },

    /// The fetched resource is not a PDF.
    #[error("'{source_name}' is not a PDF document")]
    NotAPdf { source_name: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// Byte stream could not be parsed as a PDF.
    #[error("Error reading PDF: {detail}")]
    ExtractionFailed { detail: String },

    /// PDF is encrypted; no password can be supplied through this API.
    #[error("PDF is encrypted and requires a password")]
    PasswordRequired,

    /// PDF parsed but contains no pages.
    #[error("PDF contains no pages")]
    NoPages,

    /// Every page parsed but none carried a text layer (e.g. scanned images).
    #[error("Could not extract text from PDF ({pages} pages, no text layer)")]
    EmptyDocument { pages: usize },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The model did not answer within the configured bound.
    #[error("Summary generation timed out after {secs}s")]
    GenerationTimeout { secs: u64 },

    /// The provider rejected or failed the request (quota, key, policy, network).
    #[error("Error generating summary: {message}")]
    GenerationFailed { message: String },

    /// The provider could not be constructed (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Machine-readable error category, serialised as `kind` in error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Fetch,
    Extraction,
    EmptyDocument,
    GenerationTimeout,
    Generation,
    Internal,
}

impl ErrorKind {
    /// `true` when resubmitting the same request cannot succeed.
    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            ErrorKind::Validation | ErrorKind::Extraction | ErrorKind::EmptyDocument
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Fetch => "fetch",
            ErrorKind::Extraction => "extraction",
            ErrorKind::EmptyDocument => "empty_document",
            ErrorKind::GenerationTimeout => "generation_timeout",
            ErrorKind::Generation => "generation",
            ErrorKind::Internal => "internal",
        }
    }
}

impl SummarizeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SummarizeError::Validation(_)
            | SummarizeError::FileTooLarge { .. }
            | SummarizeError::RequestTooLarge { .. } => ErrorKind::Validation,
            SummarizeError::FetchFailed { .. } | SummarizeError::FetchTimeout { .. } => {
                ErrorKind::Fetch
            }
            SummarizeError::NotAPdf { .. }
            | SummarizeError::ExtractionFailed { .. }
            | SummarizeError::PasswordRequired
            | SummarizeError::NoPages => ErrorKind::Extraction,
            SummarizeError::EmptyDocument { .. } => ErrorKind::EmptyDocument,
            SummarizeError::GenerationTimeout { .. } => ErrorKind::GenerationTimeout,
            SummarizeError::GenerationFailed { .. } => ErrorKind::Generation,
            SummarizeError::ProviderNotConfigured { .. } | SummarizeError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        SummarizeError::Validation(msg.into())
    }
}
