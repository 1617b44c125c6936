//! Summary generation: the single model call of a request.
//!
//! [`SummaryModel`] is the seam between the pipeline and the generative
//! provider. [`LlmSummaryModel`] implements it on top of any
//! `edgequake_llm` provider; tests substitute their own implementation.
//!
//! Exactly one attempt is made per request. The call is bounded by
//! `api_timeout_secs` and provider errors are reported with the provider's
//! own message attached.

use crate::error::SummarizeError;
use crate::prompts::{build_instruction, document_message};
use crate::request::SummarizeRequest;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

/// Everything the model needs besides the document text. A pure function of
/// the request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParameters {
    pub instruction: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl GenerationParameters {
    pub fn from_request(request: &SummarizeRequest) -> Self {
        Self {
            instruction: build_instruction(
                request.style,
                request.max_tokens,
                request.output_language,
            ),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

/// A generative model that turns a document into a summary.
#[async_trait]
pub trait SummaryModel: Send + Sync {
    /// Summarise `text` according to `params`. Returns the generated text.
    async fn generate(
        &self,
        text: &str,
        params: &GenerationParameters,
    ) -> Result<String, SummarizeError>;
}

/// [`SummaryModel`] backed by an `edgequake_llm` provider.
pub struct LlmSummaryModel {
    provider: Arc<dyn LLMProvider>,
    timeout_secs: u64,
}

impl LlmSummaryModel {
    pub fn new(provider: Arc<dyn LLMProvider>, timeout_secs: u64) -> Self {
        Self {
            provider,
            timeout_secs,
        }
    }
}

#[async_trait]
impl SummaryModel for LlmSummaryModel {
    /// ## Message Layout
    ///
    /// 1. **System message** — the instruction from [`crate::prompts`]
    /// 2. **User message** — the full extracted text
    async fn generate(
        &self,
        text: &str,
        params: &GenerationParameters,
    ) -> Result<String, SummarizeError> {
        let start = Instant::now();
        let messages = vec![
            ChatMessage::system(params.instruction.as_str()),
            ChatMessage::user(document_message(text)),
        ];
        let options = build_options(params);

        let call = self.provider.chat(&messages, Some(&options));
        let response = match timeout(Duration::from_secs(self.timeout_secs), call).await {
            Err(_) => {
                warn!("Model call exceeded {}s", self.timeout_secs);
                return Err(SummarizeError::GenerationTimeout {
                    secs: self.timeout_secs,
                });
            }
            Ok(Err(e)) => {
                return Err(SummarizeError::GenerationFailed {
                    message: e.to_string(),
                })
            }
            Ok(Ok(response)) => response,
        };

        debug!(
            "Model answered: {} input tokens, {} output tokens, {:?}",
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );

        finish_output(&response.content)
    }
}

/// Nucleus sampling cutoff sent with every request.
pub const TOP_P: f32 = 0.95;

/// Build `CompletionOptions` from the generation parameters.
fn build_options(params: &GenerationParameters) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(params.temperature as f32),
        max_tokens: Some(params.max_tokens as usize),
        top_p: Some(TOP_P),
        ..Default::default()
    }
}

/// Trim surrounding whitespace; nothing else is touched.
fn finish_output(raw: &str) -> Result<String, SummarizeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SummarizeError::GenerationFailed {
            message: "No response generated from the model".into(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{InputSource, OutputLanguage, SummaryStyle};

    fn request(max_tokens: u32, temperature: f64) -> SummarizeRequest {
        SummarizeRequest {
            source: InputSource::Url("https://example.com/a.pdf".into()),
            max_tokens,
            temperature,
            style: SummaryStyle::Concise,
            output_language: OutputLanguage::English,
        }
    }

    #[test]
    fn parameters_follow_request() {
        let params = GenerationParameters::from_request(&request(512, 0.3));
        assert_eq!(params.max_tokens, 512);
        assert_eq!(params.temperature, 0.3);
        assert!(params.instruction.contains("main points only"));
        assert!(params.instruction.contains("Respond in English"));
        assert_eq!(params, GenerationParameters::from_request(&request(512, 0.3)));
    }

    #[test]
    fn build_options_copies_budget_and_temperature() {
        let opts = build_options(&GenerationParameters::from_request(&request(2048, 0.5)));
        assert_eq!(opts.temperature, Some(0.5));
        assert_eq!(opts.max_tokens, Some(2048));
        assert_eq!(opts.top_p, Some(0.95));
    }

    #[test]
    fn output_is_trimmed_only() {
        assert_eq!(
            finish_output("\n\n  - point one\n  - point two \n").unwrap(),
            "- point one\n  - point two"
        );
    }

    #[test]
    fn empty_output_is_an_error() {
        let err = finish_output(" \n\t").unwrap_err();
        assert!(matches!(err, SummarizeError::GenerationFailed { .. }));
    }
}
