//! Shared helpers for the integration tests: PDF fixtures built in memory,
//! stub pipeline parts, and a multipart body writer.

#![allow(dead_code)]

use async_trait::async_trait;
use edgequake_llm::{
    ChatMessage, CompletionOptions, LLMProvider, LLMResponse, LlmError, Result as LlmResult,
};
use lopdf::content::{Content, Operation};
use lopdf::encryption::{decrypt_object, get_encryption_key};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use pdf_summarizer::{
    ExtractedDocument, GenerationParameters, LopdfExtractor, PdfTextExtractor, SummarizeError,
    Summarizer, SummarizerConfig, SummaryModel,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── PDF fixtures ─────────────────────────────────────────────────────────────

/// Build a PDF with one page per entry in `pages`, each showing its text in
/// Courier.
pub fn sample_pdf(pages: &[&str]) -> Vec<u8> {
    let (mut doc, _) = build_document(pages);
    save(&mut doc)
}

/// Standard password padding string used by the RC4 security handler.
const PASSWORD_PAD: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

const FILE_ID: [u8; 16] = *b"pdfsum-fixture01";

/// Build an RC4-40 (V1/R2) encrypted PDF.
///
/// With `empty_user_password` the file is locked by an owner password only
/// and opens without one; otherwise the user password is unknown.
pub fn encrypted_pdf(pages: &[&str], empty_user_password: bool) -> Vec<u8> {
    let (mut doc, content_ids) = build_document(pages);
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "Length" => 40,
        "O" => Object::string_literal(vec![0x5A_u8; 32]),
        "P" => -4,
    });
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer.set(
        "ID",
        vec![
            Object::string_literal(FILE_ID.to_vec()),
            Object::string_literal(FILE_ID.to_vec()),
        ],
    );

    let key = get_encryption_key(&doc, "", false).expect("derive file key");
    let user_entry = if empty_user_password {
        rc4(&key, &PASSWORD_PAD)
    } else {
        vec![0_u8; 32]
    };
    doc.get_object_mut(encrypt_id)
        .and_then(Object::as_dict_mut)
        .expect("encrypt dictionary")
        .set("U", Object::string_literal(user_entry));

    // RC4 is symmetric: "decrypting" the plain stream yields its ciphertext.
    for id in content_ids {
        let plain = doc.get_object(id).expect("content stream").clone();
        let cipher = decrypt_object(&key, id, &plain).expect("encrypt content stream");
        if let Ok(Object::Stream(stream)) = doc.get_object_mut(id) {
            stream.set_content(cipher);
        }
    }
    save(&mut doc)
}

/// A structurally valid PDF whose page tree is empty.
pub fn pageless_pdf() -> Vec<u8> {
    let (mut doc, _) = build_document(&[]);
    save(&mut doc)
}

fn build_document(pages: &[&str]) -> (Document, Vec<ObjectId>) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    let mut content_ids = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let encoded = content.encode().expect("encode page content");
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
        content_ids.push(content_id);
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    (doc, content_ids)
}

fn save(doc: &mut Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("save fixture pdf");
    buf
}

fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut s: Vec<u8> = (0..=255).collect();
    let mut j: u8 = 0;
    for i in 0..256 {
        j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
        s.swap(i, j as usize);
    }
    let (mut i, mut j) = (0_u8, 0_u8);
    data.iter()
        .map(|byte| {
            i = i.wrapping_add(1);
            j = j.wrapping_add(s[i as usize]);
            s.swap(i as usize, j as usize);
            byte ^ s[s[i as usize].wrapping_add(s[j as usize]) as usize]
        })
        .collect()
}

// ── Stub pipeline parts ──────────────────────────────────────────────────────

/// The real lopdf extractor, counting how often it runs.
#[derive(Default)]
pub struct CountingExtractor {
    pub calls: AtomicUsize,
}

impl CountingExtractor {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PdfTextExtractor for CountingExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedDocument, SummarizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        LopdfExtractor.extract(bytes)
    }
}

/// Model stub that records every call and answers with a fixed summary.
pub struct RecordingModel {
    reply: String,
    pub seen: Mutex<Vec<(String, GenerationParameters)>>,
}

impl RecordingModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl SummaryModel for RecordingModel {
    async fn generate(
        &self,
        text: &str,
        params: &GenerationParameters,
    ) -> Result<String, SummarizeError> {
        self.seen
            .lock()
            .unwrap()
            .push((text.to_string(), params.clone()));
        Ok(self.reply.clone())
    }
}

pub struct Harness {
    pub summarizer: Arc<Summarizer>,
    pub extractor: Arc<CountingExtractor>,
    pub model: Arc<RecordingModel>,
}

/// A summarizer over the counting extractor and a recording model.
pub fn harness(config: SummarizerConfig) -> Harness {
    let extractor = Arc::new(CountingExtractor::default());
    let model = Arc::new(RecordingModel::new("A short summary."));
    let summarizer = Summarizer::with_parts(config, extractor.clone(), model.clone())
        .expect("build summarizer");
    Harness {
        summarizer: Arc::new(summarizer),
        extractor,
        model,
    }
}

// ── Scripted LLM provider ────────────────────────────────────────────────────

/// How [`ScriptedProvider`] answers every chat call.
#[derive(Debug, Clone)]
pub enum Script {
    Reply(&'static str),
    Fail(&'static str),
    Stall(Duration),
}

/// An `edgequake_llm` provider with a fixed behaviour that records the
/// options of each call.
pub struct ScriptedProvider {
    script: Script,
    pub options: Mutex<Vec<CompletionOptions>>,
}

impl ScriptedProvider {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            options: Mutex::new(Vec::new()),
        })
    }

    async fn answer(&self) -> LlmResult<LLMResponse> {
        match self.script {
            Script::Reply(text) => Ok(LLMResponse::new(text, "scripted-model").with_usage(40, 8)),
            Script::Fail(message) => Err(LlmError::ApiError(message.to_string())),
            Script::Stall(delay) => {
                tokio::time::sleep(delay).await;
                Ok(LLMResponse::new("too late", "scripted-model"))
            }
        }
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    fn max_context_length(&self) -> usize {
        32_768
    }

    async fn complete(&self, _prompt: &str) -> LlmResult<LLMResponse> {
        self.answer().await
    }

    async fn complete_with_options(
        &self,
        _prompt: &str,
        options: &CompletionOptions,
    ) -> LlmResult<LLMResponse> {
        self.options.lock().unwrap().push(options.clone());
        self.answer().await
    }

    async fn chat(
        &self,
        _messages: &[ChatMessage],
        options: Option<&CompletionOptions>,
    ) -> LlmResult<LLMResponse> {
        if let Some(options) = options {
            self.options.lock().unwrap().push(options.clone());
        }
        self.answer().await
    }
}

// ── Multipart bodies ─────────────────────────────────────────────────────────

pub const BOUNDARY: &str = "pdfsumtestboundary7MA4YWxk";

/// Writes `multipart/form-data` bodies by hand.
#[derive(Default)]
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.buf
    }
}
