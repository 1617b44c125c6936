//! Progress-callback trait for pipeline stage events.
//!
//! Inject an [`Arc<dyn SummaryProgressCallback>`] via
//! [`crate::config::SummarizerConfigBuilder::progress_callback`] to be told
//! when each stage of a request starts, finishes, or fails. The CLI drives
//! its spinner from these events; the HTTP server leaves it unset.
//!
//! # Example
//!
//! ```rust
//! use pdf_summarizer::{Stage, SummaryProgressCallback, SummarizerConfig};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl SummaryProgressCallback for Printer {
//!     fn on_stage_start(&self, stage: Stage) {
//!         eprintln!("{}…", stage.label());
//!     }
//! }
//!
//! let config = SummarizerConfig::builder()
//!     .progress_callback(Arc::new(Printer))
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

/// One step of the request pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Fetch,
    Extract,
    Generate,
}

impl Stage {
    /// Human-readable label, suitable for a spinner message.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Validate => "Validating input",
            Stage::Fetch => "Downloading PDF",
            Stage::Extract => "Extracting text",
            Stage::Generate => "Generating summary",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Called by the pipeline as a request moves through its stages.
///
/// Implementations must be `Send + Sync`: one `Summarizer` serves many
/// requests concurrently. All methods have no-op defaults.
pub trait SummaryProgressCallback: Send + Sync {
    /// Called just before `stage` begins.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when `stage` finished successfully.
    fn on_stage_complete(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when `stage` failed; the request ends here.
    fn on_failed(&self, stage: Stage, error: &str) {
        let _ = (stage, error);
    }

    /// Called once when a summary has been produced.
    ///
    /// * `text_length`    — characters extracted from the PDF
    /// * `summary_length` — characters in the generated summary
    fn on_complete(&self, text_length: usize, summary_length: usize) {
        let _ = (text_length, summary_length);
    }
}

/// A no-op implementation; the default when no callback is configured.
pub struct NoopProgressCallback;

impl SummaryProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SummarizerConfig`].
pub type ProgressCallback = Arc<dyn SummaryProgressCallback>;
