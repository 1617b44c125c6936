//! Request-side data model: raw form fields, validated requests, and the
//! enumerations that steer prompt construction.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default output token budget.
pub const DEFAULT_MAX_TOKENS: u32 = 8192;
/// Smallest accepted output token budget.
pub const MIN_MAX_TOKENS: u32 = 256;
/// Largest accepted output token budget.
pub const MAX_MAX_TOKENS: u32 = 8192;
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Uploads larger than this are rejected (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ── Enums ────────────────────────────────────────────────────────────────

/// Qualitative preset controlling the prose shape of the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    /// Well-structured paragraphs covering every key idea. (default)
    #[default]
    Comprehensive,
    /// Three to four short paragraphs.
    Concise,
    /// A list of key points.
    Bullet,
}

impl SummaryStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            SummaryStyle::Comprehensive => "comprehensive",
            SummaryStyle::Concise => "concise",
            SummaryStyle::Bullet => "bullet",
        }
    }
}

impl FromStr for SummaryStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "comprehensive" => Ok(SummaryStyle::Comprehensive),
            "concise" => Ok(SummaryStyle::Concise),
            "bullet" => Ok(SummaryStyle::Bullet),
            other => Err(format!(
                "summary_style must be 'comprehensive', 'concise', or 'bullet' (got '{other}')"
            )),
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language the summary is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLanguage {
    /// Same language as the source document. (default)
    #[default]
    Auto,
    English,
    Indonesian,
}

impl OutputLanguage {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputLanguage::Auto => "auto",
            OutputLanguage::English => "english",
            OutputLanguage::Indonesian => "indonesian",
        }
    }
}

impl FromStr for OutputLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(OutputLanguage::Auto),
            "english" => Ok(OutputLanguage::English),
            "indonesian" => Ok(OutputLanguage::Indonesian),
            other => Err(format!(
                "output_language must be 'auto', 'english', or 'indonesian' (got '{other}')"
            )),
        }
    }
}

impl fmt::Display for OutputLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Raw form ─────────────────────────────────────────────────────────────

/// An uploaded file exactly as received.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Unvalidated request fields, as they arrive from a multipart body or the
/// command line. Every field is optional; [`crate::pipeline::validate`]
/// turns this into a [`SummarizeRequest`] or rejects it.
#[derive(Debug, Clone, Default)]
pub struct SummarizeForm {
    pub file: Option<UploadedFile>,
    pub pdf_url: Option<String>,
    pub max_tokens: Option<String>,
    pub temperature: Option<String>,
    pub summary_style: Option<String>,
    pub output_language: Option<String>,
}

// ── Validated request ────────────────────────────────────────────────────

/// Where the PDF comes from. Exactly one per request.
#[derive(Debug, Clone)]
pub enum InputSource {
    Upload { filename: String, bytes: Bytes },
    Url(String),
}

impl InputSource {
    /// Short label for logs: the filename or the URL.
    pub fn describe(&self) -> &str {
        match self {
            InputSource::Upload { filename, .. } => filename,
            InputSource::Url(url) => url,
        }
    }
}

/// A request that has passed validation. Only the validator constructs one,
/// so every instance satisfies the range and enum invariants.
#[derive(Debug, Clone)]
pub struct SummarizeRequest {
    pub source: InputSource,
    pub max_tokens: u32,
    pub temperature: f64,
    pub style: SummaryStyle,
    pub output_language: OutputLanguage,
}
