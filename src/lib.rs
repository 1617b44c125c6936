//! # pdf-summarizer
//!
//! Summarise PDF documents with a generative LLM. A PDF arrives as an upload
//! or a URL; its text layer is extracted, a prompt is built from the
//! requested length, style and language, and the model's answer is returned
//! together with the parameters that produced it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! request
//!  │
//!  ├─ 1. Validate  exactly one source, ranges, enums, upload size
//!  ├─ 2. Input     uploaded bytes, or download the URL (timeout, size cap)
//!  ├─ 3. Extract   page texts via lopdf (spawn_blocking)
//!  ├─ 4. Prompt    instruction from token band + style + language
//!  ├─ 5. Generate  one LLM call, bounded by a timeout
//!  └─ 6. Compose   summary + metadata
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_summarizer::{server, Summarizer, SummarizerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GEMINI_API_KEY; fails here if it is missing.
//!     let summarizer = Summarizer::new(SummarizerConfig::default())?;
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//!     server::serve(listener, Arc::new(summarizer)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-summarizer` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod cache;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod request;
pub mod response;
pub mod server;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use cache::{CacheError, CachedSummary, LastResultCache};
pub use config::{SummarizerConfig, SummarizerConfigBuilder};
pub use error::{ErrorKind, SummarizeError};
pub use pipeline::extract::{ExtractedDocument, LopdfExtractor, PdfTextExtractor};
pub use pipeline::generate::{GenerationParameters, LlmSummaryModel, SummaryModel};
pub use pipeline::validate::{has_pdf_signature, validate};
pub use progress::{NoopProgressCallback, ProgressCallback, Stage, SummaryProgressCallback};
pub use request::{
    InputSource, OutputLanguage, SummarizeForm, SummarizeRequest, SummaryStyle, UploadedFile,
};
pub use response::{ErrorResponse, SummaryMetadata, SummaryResponse, SummaryResult};
pub use summarize::Summarizer;
