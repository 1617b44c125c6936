//! The request pipeline: validate → fetch → extract → generate → compose.
//!
//! A [`Summarizer`] is built once per process and shared behind an `Arc`.
//! It holds no per-request state: every call to [`Summarizer::summarize`]
//! creates, uses and drops its own document and parameters, so concurrent
//! requests cannot interfere. Stages run strictly one after another and the
//! first failure ends the request.

use crate::config::SummarizerConfig;
use crate::error::SummarizeError;
use crate::pipeline::extract::{extract_document, LopdfExtractor, PdfTextExtractor};
use crate::pipeline::generate::{GenerationParameters, LlmSummaryModel, SummaryModel};
use crate::pipeline::{input, validate};
use crate::progress::Stage;
use crate::request::{InputSource, SummarizeForm, SummarizeRequest};
use crate::response::SummaryResult;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Runs summarisation requests.
pub struct Summarizer {
    config: SummarizerConfig,
    extractor: Arc<dyn PdfTextExtractor>,
    model: Arc<dyn SummaryModel>,
    http: reqwest::Client,
}

impl Summarizer {
    /// Build a summarizer with the `lopdf` extractor and the configured LLM
    /// provider.
    ///
    /// # Errors
    /// [`SummarizeError::ProviderNotConfigured`] when the provider's API key
    /// is missing. Call this at startup: a missing key is fatal for the
    /// process, never a per-request failure.
    pub fn new(config: SummarizerConfig) -> Result<Self, SummarizeError> {
        let provider = resolve_provider(&config)?;
        let model = LlmSummaryModel::new(provider, config.api_timeout_secs);
        Self::with_parts(config, Arc::new(LopdfExtractor), Arc::new(model))
    }

    /// Build a summarizer from explicit parts.
    pub fn with_parts(
        config: SummarizerConfig,
        extractor: Arc<dyn PdfTextExtractor>,
        model: Arc<dyn SummaryModel>,
    ) -> Result<Self, SummarizeError> {
        let http = input::build_http_client(config.download_timeout_secs)?;
        Ok(Self {
            config,
            extractor,
            model,
            http,
        })
    }

    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    /// Validate a raw form, then run the pipeline on it.
    pub async fn summarize_form(&self, form: SummarizeForm) -> Result<SummaryResult, SummarizeError> {
        self.notify_start(Stage::Validate);
        let request = match validate::validate(form, self.config.max_upload_bytes) {
            Ok(request) => request,
            Err(e) => {
                self.notify_failed(Stage::Validate, &e);
                return Err(e);
            }
        };
        self.notify_complete(Stage::Validate);
        self.summarize(&request).await
    }

    /// Run the pipeline on an already validated request.
    pub async fn summarize(&self, request: &SummarizeRequest) -> Result<SummaryResult, SummarizeError> {
        let start = Instant::now();
        info!(
            "Summarizing '{}' (max_tokens={}, temperature={}, style={}, language={})",
            request.source.describe(),
            request.max_tokens,
            request.temperature,
            request.style,
            request.output_language
        );

        // ── Step 1: Resolve input bytes ──────────────────────────────────
        let bytes = match &request.source {
            InputSource::Url(_) => {
                self.run_stage(
                    Stage::Fetch,
                    input::resolve_input(
                        &self.http,
                        &request.source,
                        self.config.download_timeout_secs,
                        self.config.max_upload_bytes,
                    ),
                )
                .await?
            }
            InputSource::Upload { bytes, .. } => bytes.clone(),
        };

        // ── Step 2: Extract text ─────────────────────────────────────────
        let extractor = Arc::clone(&self.extractor);
        let document = self
            .run_stage(Stage::Extract, async move {
                let document = extract_document(extractor, bytes).await?;
                if document.is_blank() {
                    return Err(SummarizeError::EmptyDocument {
                        pages: document.page_count(),
                    });
                }
                Ok(document)
            })
            .await?;
        info!(
            "Extracted {} characters from {} pages",
            document.char_count(),
            document.page_count()
        );

        // ── Step 3: Build prompt + generate ──────────────────────────────
        let params = GenerationParameters::from_request(request);
        let summary = self
            .run_stage(Stage::Generate, self.model.generate(document.text(), &params))
            .await?;

        // ── Step 4: Compose ──────────────────────────────────────────────
        let result = SummaryResult::compose(summary, request, &document);
        info!(
            "Summary complete: {} chars in {}ms",
            result.summary.chars().count(),
            start.elapsed().as_millis()
        );
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_complete(result.metadata.text_length, result.summary.chars().count());
        }
        Ok(result)
    }

    async fn run_stage<T, F>(&self, stage: Stage, fut: F) -> Result<T, SummarizeError>
    where
        F: Future<Output = Result<T, SummarizeError>>,
    {
        self.notify_start(stage);
        match fut.await {
            Ok(value) => {
                self.notify_complete(stage);
                Ok(value)
            }
            Err(e) => {
                self.notify_failed(stage, &e);
                Err(e)
            }
        }
    }

    fn notify_start(&self, stage: Stage) {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_stage_start(stage);
        }
    }

    fn notify_complete(&self, stage: Stage) {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_stage_complete(stage);
        }
    }

    fn notify_failed(&self, stage: Stage, error: &SummarizeError) {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_failed(stage, &error.to_string());
        }
    }
}

// ── Provider resolution ──────────────────────────────────────────────────

/// Environment variable holding the API key for a hosted provider.
///
/// Local providers (ollama, lmstudio) need none.
pub fn api_key_var(provider_name: &str) -> Option<&'static str> {
    match provider_name.to_ascii_lowercase().as_str() {
        "gemini" | "google" => Some("GEMINI_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        "mistral" => Some("MISTRAL_API_KEY"),
        "openrouter" => Some("OPENROUTER_API_KEY"),
        _ => None,
    }
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) is used as-is.
/// 2. **Named provider + model**: the API key variable for the provider must
///    be set and non-empty, then [`ProviderFactory::create_llm_provider`]
///    constructs it.
pub fn resolve_provider(config: &SummarizerConfig) -> Result<Arc<dyn LLMProvider>, SummarizeError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    let name = config.provider_name.as_str();
    if let Some(var) = api_key_var(name) {
        let present = std::env::var(var).map(|v| !v.trim().is_empty()).unwrap_or(false);
        if !present {
            warn!("{} is not set", var);
            return Err(SummarizeError::ProviderNotConfigured {
                provider: name.to_string(),
                hint: format!("Set {var} to your API key before starting the service."),
            });
        }
    }

    info!("Using LLM provider '{}' with model '{}'", name, config.model);
    ProviderFactory::create_llm_provider(name, &config.model).map_err(|e| {
        SummarizeError::ProviderNotConfigured {
            provider: name.to_string(),
            hint: format!("{e}"),
        }
    })
}
