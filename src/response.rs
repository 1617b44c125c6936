//! Response composition: the wire shapes returned to clients.

use crate::error::{ErrorKind, SummarizeError};
use crate::pipeline::extract::ExtractedDocument;
use crate::request::{OutputLanguage, SummarizeRequest, SummaryStyle};
use serde::{Deserialize, Serialize};

/// Parameters echoed back alongside the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetadata {
    /// Characters in the extracted text (not in the summary).
    pub text_length: usize,
    pub max_tokens: u32,
    pub temperature: f64,
    pub summary_style: SummaryStyle,
    pub output_language: OutputLanguage,
}

/// A generated summary and the parameters that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
    pub metadata: SummaryMetadata,
}

impl SummaryResult {
    /// Package `summary` with metadata taken from the request and document.
    pub fn compose(summary: String, request: &SummarizeRequest, document: &ExtractedDocument) -> Self {
        Self {
            summary,
            metadata: SummaryMetadata {
                text_length: document.char_count(),
                max_tokens: request.max_tokens,
                temperature: request.temperature,
                summary_style: request.style,
                output_language: request.output_language,
            },
        }
    }
}

/// `200 OK` body: `{ "success": true, "summary": …, "metadata": {…} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub summary: String,
    pub metadata: SummaryMetadata,
}

impl From<SummaryResult> for SummaryResponse {
    fn from(result: SummaryResult) -> Self {
        Self {
            success: true,
            summary: result.summary,
            metadata: result.metadata,
        }
    }
}

/// Error body: `{ "success": false, "error": …, "kind": … }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub kind: ErrorKind,
}

impl From<&SummarizeError> for ErrorResponse {
    fn from(err: &SummarizeError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
            kind: err.kind(),
        }
    }
}
