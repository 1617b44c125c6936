//! Prompt construction for PDF summarisation.
//!
//! Every instruction the model receives is assembled here, as a pure function
//! of the request, so prompt regressions can be caught by unit tests without
//! a provider. The document text is carried through untouched: length is
//! controlled by the output token budget, never by cutting the input.

use crate::request::{OutputLanguage, SummaryStyle};

/// Opening line shared by every instruction.
pub const PREAMBLE: &str =
    "You are an expert document analyst. Summarize the document provided by the user.";

/// Directive for budgets below 1024 tokens.
pub const LOW_BUDGET_DIRECTIVE: &str = "Focus on the main points only.";
/// Directive for budgets from 1024 up to 4095 tokens.
pub const MEDIUM_BUDGET_DIRECTIVE: &str = "Balance detail and brevity.";
/// Directive for budgets of 4096 tokens and more.
pub const HIGH_BUDGET_DIRECTIVE: &str =
    "Provide comprehensive coverage of the document, but avoid padding.";

/// Output-length band derived from `max_tokens`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenBand {
    /// 256–1023
    Low,
    /// 1024–4095
    Medium,
    /// 4096–8192
    High,
}

impl TokenBand {
    pub fn for_budget(max_tokens: u32) -> Self {
        match max_tokens {
            0..=1023 => TokenBand::Low,
            1024..=4095 => TokenBand::Medium,
            _ => TokenBand::High,
        }
    }

    pub fn directive(self) -> &'static str {
        match self {
            TokenBand::Low => LOW_BUDGET_DIRECTIVE,
            TokenBand::Medium => MEDIUM_BUDGET_DIRECTIVE,
            TokenBand::High => HIGH_BUDGET_DIRECTIVE,
        }
    }
}

fn style_requirements(style: SummaryStyle) -> &'static [&'static str] {
    match style {
        SummaryStyle::Comprehensive => &[
            "Use clear, well-structured paragraphs.",
            "Highlight all key ideas and include important details and context.",
            "Be thorough but coherent; do not be verbose.",
        ],
        SummaryStyle::Concise => &[
            "Use clear, simple language.",
            "Keep it brief: at most 3-4 paragraphs.",
        ],
        SummaryStyle::Bullet => &[
            "Organize the summary as a list of key points.",
            "Keep each point concise and order the points logically.",
        ],
    }
}

fn language_directive(language: OutputLanguage) -> &'static str {
    match language {
        OutputLanguage::Auto => "Respond in the same language as the source text.",
        OutputLanguage::English => "Respond in English, regardless of the source language.",
        OutputLanguage::Indonesian => {
            "Respond in Indonesian (Bahasa Indonesia), regardless of the source language."
        }
    }
}

/// Build the generation instruction for the given style, budget and language.
///
/// Deterministic: equal arguments always produce byte-identical output.
pub fn build_instruction(style: SummaryStyle, max_tokens: u32, language: OutputLanguage) -> String {
    let mut out = String::from(PREAMBLE);
    out.push_str("\n\n");
    out.push_str(language_directive(language));
    out.push_str("\n\nRequirements:\n");
    out.push_str("- ");
    out.push_str(TokenBand::for_budget(max_tokens).directive());
    out.push('\n');
    for line in style_requirements(style) {
        out.push_str("- ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("- Output only the summary, without preamble or commentary.");
    out
}

/// Wrap the extracted text as the user message. The text is passed through
/// in full.
pub fn document_message(text: &str) -> String {
    format!("Document:\n\n{text}")
}
