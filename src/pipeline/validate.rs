//! Input validation: turn a raw [`SummarizeForm`] into a [`SummarizeRequest`].
//!
//! Runs before any expensive work. A form that fails here never reaches the
//! fetcher, the parser or the model.

use crate::error::SummarizeError;
use crate::request::{
    InputSource, OutputLanguage, SummarizeForm, SummarizeRequest, SummaryStyle,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, MAX_MAX_TOKENS, MIN_MAX_TOKENS,
};
use reqwest::Url;

/// Leading bytes of every PDF file.
pub const PDF_SIGNATURE: &[u8; 5] = b"%PDF-";

/// Magic-byte check: does `bytes` start with `%PDF-`?
///
/// A client-side convenience for rejecting obviously wrong files early. The
/// server does not depend on it; the parser is the real judge.
pub fn has_pdf_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_SIGNATURE)
}

/// Validate `form`, rejecting uploads larger than `max_upload_bytes`.
pub fn validate(
    form: SummarizeForm,
    max_upload_bytes: usize,
) -> Result<SummarizeRequest, SummarizeError> {
    let max_tokens = parse_max_tokens(form.max_tokens.as_deref())?;
    let temperature = parse_temperature(form.temperature.as_deref())?;
    let style = match present(form.summary_style.as_deref()) {
        Some(s) => s.parse::<SummaryStyle>().map_err(SummarizeError::Validation)?,
        None => SummaryStyle::default(),
    };
    let output_language = match present(form.output_language.as_deref()) {
        Some(s) => s
            .parse::<OutputLanguage>()
            .map_err(SummarizeError::Validation)?,
        None => OutputLanguage::default(),
    };

    let url = present(form.pdf_url.as_deref()).map(str::to_string);
    let source = match (form.file, url) {
        (Some(_), Some(_)) => {
            return Err(SummarizeError::validation(
                "Provide either a PDF file or a PDF URL, not both",
            ))
        }
        (None, None) => return Err(SummarizeError::validation("No PDF file or URL provided")),
        (Some(file), None) => {
            let filename = file.filename.trim().to_string();
            if filename.is_empty() {
                return Err(SummarizeError::validation("No file selected"));
            }
            if !filename.to_ascii_lowercase().ends_with(".pdf") {
                return Err(SummarizeError::validation("File must be a PDF"));
            }
            if file.bytes.len() > max_upload_bytes {
                return Err(SummarizeError::FileTooLarge {
                    size: file.bytes.len(),
                    max: max_upload_bytes,
                });
            }
            InputSource::Upload {
                filename,
                bytes: file.bytes,
            }
        }
        (None, Some(url)) => {
            validate_url(&url)?;
            InputSource::Url(url)
        }
    };

    Ok(SummarizeRequest {
        source,
        max_tokens,
        temperature,
        style,
        output_language,
    })
}

/// `None` for absent or blank fields; HTML forms submit empty strings.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_max_tokens(raw: Option<&str>) -> Result<u32, SummarizeError> {
    let Some(raw) = present(raw) else {
        return Ok(DEFAULT_MAX_TOKENS);
    };
    let value: i64 = raw
        .parse()
        .map_err(|_| SummarizeError::validation(format!("max_tokens must be an integer (got '{raw}')")))?;
    if value < MIN_MAX_TOKENS as i64 || value > MAX_MAX_TOKENS as i64 {
        return Err(SummarizeError::validation(format!(
            "max_tokens must be between {MIN_MAX_TOKENS} and {MAX_MAX_TOKENS} (got {value})"
        )));
    }
    Ok(value as u32)
}

fn parse_temperature(raw: Option<&str>) -> Result<f64, SummarizeError> {
    let Some(raw) = present(raw) else {
        return Ok(DEFAULT_TEMPERATURE);
    };
    let value: f64 = raw
        .parse()
        .map_err(|_| SummarizeError::validation(format!("temperature must be a number (got '{raw}')")))?;
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(SummarizeError::validation(format!(
            "temperature must be between 0.0 and 1.0 (got {raw})"
        )));
    }
    Ok(value)
}

fn validate_url(url: &str) -> Result<(), SummarizeError> {
    let parsed = Url::parse(url)
        .map_err(|e| SummarizeError::validation(format!("Invalid PDF URL '{url}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(SummarizeError::validation(format!(
            "PDF URL must use http or https (got '{other}')"
        ))),
    }
}
