//! Configuration for the summarisation pipeline.
//!
//! All pipeline behaviour is controlled through [`SummarizerConfig`], built
//! via its [`SummarizerConfigBuilder`]. The HTTP server and the CLI both map
//! their flags onto this one struct, so a summary produced by either surface
//! is governed by the same knobs.

use crate::error::SummarizeError;
use crate::progress::ProgressCallback;
use crate::request::DEFAULT_MAX_UPLOAD_BYTES;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Provider used when none is configured.
pub const DEFAULT_PROVIDER: &str = "gemini";
/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Configuration for a [`crate::Summarizer`].
///
/// # Example
/// ```rust
/// use pdf_summarizer::SummarizerConfig;
///
/// let config = SummarizerConfig::builder()
///     .model("gemini-2.5-pro")
///     .api_timeout_secs(60)
///     .build()
///     .unwrap();
/// assert_eq!(config.model, "gemini-2.5-pro");
/// ```
#[derive(Clone)]
pub struct SummarizerConfig {
    /// LLM provider name (e.g. "gemini", "openai", "anthropic", "ollama").
    /// Default: "gemini".
    pub provider_name: String,

    /// Model identifier passed to the provider. Default: "gemini-2.0-flash".
    pub model: String,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Largest accepted PDF, for uploads and downloads alike. Default: 10 MiB.
    pub max_upload_bytes: usize,

    /// Timeout for fetching URL inputs, in seconds. Default: 30.
    pub download_timeout_secs: u64,

    /// Bound on the single model call, in seconds. Default: 110.
    ///
    /// Kept under the browser client's 120 s so the server answers with a
    /// proper timeout error before the client gives up on the connection.
    pub api_timeout_secs: u64,

    /// Receives stage events as a request moves through the pipeline.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            provider_name: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            provider: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            download_timeout_secs: 30,
            api_timeout_secs: 110,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SummarizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizerConfig")
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn SummaryProgressCallback>"),
            )
            .finish()
    }
}

impl SummarizerConfig {
    /// Create a new builder for `SummarizerConfig`.
    pub fn builder() -> SummarizerConfigBuilder {
        SummarizerConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SummarizerConfig`].
#[derive(Debug)]
pub struct SummarizerConfigBuilder {
    config: SummarizerConfig,
}

impl SummarizerConfigBuilder {
    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummarizerConfig, SummarizeError> {
        let c = &self.config;
        if c.provider_name.trim().is_empty() {
            return Err(SummarizeError::Internal(
                "Invalid configuration: provider name must not be empty".into(),
            ));
        }
        if c.model.trim().is_empty() {
            return Err(SummarizeError::Internal(
                "Invalid configuration: model must not be empty".into(),
            ));
        }
        if c.max_upload_bytes == 0 {
            return Err(SummarizeError::Internal(
                "Invalid configuration: upload limit must be ≥ 1 byte".into(),
            ));
        }
        if c.download_timeout_secs == 0 || c.api_timeout_secs == 0 {
            return Err(SummarizeError::Internal(
                "Invalid configuration: timeouts must be ≥ 1s".into(),
            ));
        }
        Ok(self.config)
    }
}
