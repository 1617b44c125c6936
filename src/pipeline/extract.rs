//! PDF text extraction.
//!
//! Parsing is CPU-bound and synchronous, so the async entry point
//! [`extract_document`] moves it onto tokio's blocking pool. The parser sits
//! behind [`PdfTextExtractor`] so the pipeline can be exercised without one.
//!
//! Page assembly rule: pages are read in page order, each page's text is
//! trimmed, and every non-empty page contributes its text followed by one
//! `\n`. A page with no text layer contributes nothing.

use crate::error::SummarizeError;
use bytes::Bytes;
use lopdf::encryption::DecryptionError;
use lopdf::Document;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Plain text pulled out of a PDF. Created once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    text: String,
    char_count: usize,
    page_count: usize,
}

impl ExtractedDocument {
    pub fn new(text: String, page_count: usize) -> Self {
        let char_count = text.chars().count();
        Self {
            text,
            char_count,
            page_count,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in characters (Unicode scalar values), not bytes.
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// `true` when no page carried any non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Converts raw PDF bytes into text.
pub trait PdfTextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedDocument, SummarizeError>;
}

/// Production extractor backed by `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl PdfTextExtractor for LopdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedDocument, SummarizeError> {
        let mut doc = Document::load_mem(bytes).map_err(|e| {
            let detail = e.to_string();
            if detail.to_ascii_lowercase().contains("encrypt") {
                SummarizeError::PasswordRequired
            } else {
                SummarizeError::ExtractionFailed { detail }
            }
        })?;

        if doc.is_encrypted() {
            open_with_empty_password(&mut doc)?;
        }

        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(SummarizeError::NoPages);
        }
        info!("PDF loaded: {} pages", pages.len());

        // BTreeMap keys iterate in ascending page number.
        let page_texts: Vec<String> = pages
            .keys()
            .map(|&page_num| match doc.extract_text(&[page_num]) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Page {}: no extractable text ({})", page_num, e);
                    String::new()
                }
            })
            .collect();

        let text = join_pages(&page_texts);
        debug!("Extracted {} bytes of text", text.len());
        Ok(ExtractedDocument::new(text, pages.len()))
    }
}

/// Decrypt `doc` with the empty user password.
///
/// Files protected only by an owner password (copy/print restrictions) open
/// this way. Anything else needs a password this API cannot receive.
fn open_with_empty_password(doc: &mut Document) -> Result<(), SummarizeError> {
    match doc.decrypt("") {
        Ok(()) => {
            debug!("Opened encrypted PDF with the empty user password");
            Ok(())
        }
        Err(lopdf::Error::Decryption(DecryptionError::IncorrectPassword)) => {
            Err(SummarizeError::PasswordRequired)
        }
        Err(e) => Err(SummarizeError::ExtractionFailed {
            detail: format!("unsupported encryption: {e}"),
        }),
    }
}

/// Assemble per-page texts into one document string.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut out = String::new();
    for page in pages {
        let page = page.as_ref().trim();
        if !page.is_empty() {
            out.push_str(page);
            out.push('\n');
        }
    }
    out
}

/// Run `extractor` on `bytes` off the async executor.
///
/// A panic inside the parser is reported as an extraction failure rather than
/// taking down the request task.
pub async fn extract_document(
    extractor: Arc<dyn PdfTextExtractor>,
    bytes: Bytes,
) -> Result<ExtractedDocument, SummarizeError> {
    tokio::task::spawn_blocking(move || extractor.extract(&bytes))
        .await
        .map_err(|e| {
            if e.is_panic() {
                SummarizeError::ExtractionFailed {
                    detail: "PDF parser panicked on malformed input".into(),
                }
            } else {
                SummarizeError::Internal(format!("Extraction task failed: {e}"))
            }
        })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_pages_terminates_each_page() {
        assert_eq!(
            join_pages(&["Hello world.", "Page two."]),
            "Hello world.\nPage two.\n"
        );
        assert_eq!(join_pages(&["Hello world.", "Page two."]).chars().count(), 23);
    }

    #[test]
    fn join_pages_skips_blank_pages() {
        assert_eq!(join_pages(&["  \n", "Only page\n\n", ""]), "Only page\n");
        assert_eq!(join_pages::<&str>(&[]), "");
    }

    #[test]
    fn char_count_is_not_byte_count() {
        let doc = ExtractedDocument::new("Ringkasan café\n".into(), 1);
        assert_eq!(doc.char_count(), 15);
        assert_eq!(doc.text().len(), 16);
        assert!(!doc.is_blank());
    }

    #[test]
    fn garbage_is_extraction_error() {
        let err = LopdfExtractor.extract(b"this is not a pdf").unwrap_err();
        assert!(
            matches!(err, SummarizeError::ExtractionFailed { .. }),
            "got: {err:?}"
        );
    }

    struct Panicking;

    impl PdfTextExtractor for Panicking {
        fn extract(&self, _bytes: &[u8]) -> Result<ExtractedDocument, SummarizeError> {
            panic!("boom")
        }
    }

    #[tokio::test]
    async fn parser_panic_becomes_extraction_error() {
        let err = extract_document(Arc::new(Panicking), Bytes::from_static(b"%PDF-"))
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizeError::ExtractionFailed { .. }));
    }
}
