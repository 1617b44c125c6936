//! CLI binary for pdf-summarizer.
//!
//! A thin shim over the library crate: `serve` runs the HTTP API,
//! `summarize` runs one request from the terminal, `last` shows the most
//! recent successful summary.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdf_summarizer::{
    has_pdf_signature, server, LastResultCache, OutputLanguage, ProgressCallback, Stage,
    SummarizeForm, Summarizer, SummarizerConfig, SummaryProgressCallback, SummaryStyle,
    UploadedFile,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner that names the running stage and logs one line per finished stage.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl SummaryProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: Stage) {
        self.bar.set_prefix(stage.label());
        self.bar.set_message("…");
    }

    fn on_stage_complete(&self, stage: Stage) {
        self.bar.println(format!("  {} {}", green("✓"), stage.label()));
    }

    fn on_failed(&self, stage: Stage, error: &str) {
        self.bar.finish_and_clear();
        eprintln!("  {} {}  {}", red("✗"), stage.label(), red(error));
    }

    fn on_complete(&self, text_length: usize, summary_length: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} characters summarised into {}",
            green("✔"),
            bold(&text_length.to_string()),
            bold(&summary_length.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Run the HTTP API on the default address (127.0.0.1:5000)
  pdf-summarizer serve

  # Summarise a local file
  pdf-summarizer summarize report.pdf

  # Summarise a URL as bullet points in Indonesian
  pdf-summarizer summarize https://arxiv.org/pdf/1706.03762 --style bullet --language indonesian

  # Show the last successful summary again
  pdf-summarizer last

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (required for the default provider)
  PDFSUM_PROVIDER         LLM provider (gemini, openai, anthropic, ollama, …)
  PDFSUM_MODEL            Model ID (default: gemini-2.0-flash)
  PDFSUM_BIND             Listen address for `serve`
  PDFSUM_CACHE_FILE       Where the last summary is kept
  RUST_LOG                Log filter, overrides --verbose / --quiet
"#;

/// Summarise PDF documents with a generative LLM.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-summarizer",
    version,
    about = "Summarise PDF files and URLs with a generative LLM",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// LLM provider: gemini, openai, anthropic, mistral, openrouter, ollama.
    #[arg(long, global = true, env = "PDFSUM_PROVIDER", default_value = pdf_summarizer::config::DEFAULT_PROVIDER)]
    provider: String,

    /// LLM model ID.
    #[arg(long, global = true, env = "PDFSUM_MODEL", default_value = pdf_summarizer::config::DEFAULT_MODEL)]
    model: String,

    /// HTTP download timeout in seconds for URL inputs.
    #[arg(long, global = true, env = "PDFSUM_DOWNLOAD_TIMEOUT", default_value_t = 30)]
    download_timeout: u64,

    /// LLM call timeout in seconds.
    #[arg(long, global = true, env = "PDFSUM_API_TIMEOUT", default_value_t = 110)]
    api_timeout: u64,

    /// File holding the last successful summary.
    #[arg(long, global = true, env = "PDFSUM_CACHE_FILE")]
    cache_file: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDFSUM_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDFSUM_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "PDFSUM_BIND", default_value = "127.0.0.1:5000")]
        bind: String,
    },
    /// Summarise one PDF file or URL.
    Summarize(SummarizeArgs),
    /// Print the last successful summary.
    Last {
        /// Empty the slot instead of printing it.
        #[arg(long)]
        clear: bool,

        /// Print the stored entry as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct SummarizeArgs {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Output token budget (256–8192).
    #[arg(long, default_value_t = 8192)]
    max_tokens: u32,

    /// Sampling temperature (0.0–1.0).
    #[arg(long, default_value_t = 0.7)]
    temperature: f64,

    /// Summary style: comprehensive, concise, bullet.
    #[arg(long, default_value = "comprehensive")]
    style: SummaryStyle,

    /// Output language: auto, english, indonesian.
    #[arg(long, default_value = "auto")]
    language: OutputLanguage,

    /// Print the full result with metadata as JSON.
    #[arg(long)]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "PDFSUM_NO_PROGRESS")]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback a one-shot run needs, so library
    // INFO logs are hidden while it is active.
    let show_progress = match &cli.command {
        Command::Summarize(args) => !cli.quiet && !args.no_progress && !args.json,
        _ => false,
    };
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let cache = match cli.cache_file {
        Some(ref path) => Some(LastResultCache::new(path)),
        None => LastResultCache::default_location(),
    };

    match cli.command {
        Command::Serve { ref bind } => {
            let config = build_config(&cli, None)?;
            let summarizer = Summarizer::new(config).context("Failed to start summarizer")?;
            let listener = tokio::net::TcpListener::bind(bind)
                .await
                .with_context(|| format!("Failed to bind {bind}"))?;
            server::serve(listener, Arc::new(summarizer))
                .await
                .context("Server error")?;
        }
        Command::Summarize(ref args) => {
            let progress: Option<ProgressCallback> = if show_progress {
                Some(CliProgressCallback::new() as Arc<dyn SummaryProgressCallback>)
            } else {
                None
            };
            let config = build_config(&cli, progress)?;
            let summarizer = Summarizer::new(config).context("Failed to start summarizer")?;

            let form = build_form(args).await?;
            let result = summarizer
                .summarize_form(form)
                .await
                .context("Summarization failed")?;

            if let Some(ref cache) = cache {
                // A failed cache write never fails the run.
                if let Err(e) = cache.store(&args.input, &result) {
                    tracing::warn!("{}", e);
                }
            }

            if args.json {
                let json =
                    serde_json::to_string_pretty(&result).context("Failed to serialise output")?;
                println!("{json}");
            } else {
                print_summary(&result.summary)?;
                if !cli.quiet && !show_progress {
                    eprintln!(
                        "{}",
                        dim(&format!(
                            "{} characters extracted, style {}, language {}",
                            result.metadata.text_length,
                            result.metadata.summary_style,
                            result.metadata.output_language
                        ))
                    );
                }
            }
        }
        Command::Last { clear, json } => {
            let cache = cache.context("No cache directory available; set PDFSUM_CACHE_FILE")?;
            if clear {
                cache.clear().context("Failed to clear cache")?;
                if !cli.quiet {
                    eprintln!("{} cleared {}", green("✔"), cache.path().display());
                }
                return Ok(());
            }
            match cache.load().context("Failed to read cache")? {
                Some(entry) if json => {
                    let json = serde_json::to_string_pretty(&entry)
                        .context("Failed to serialise cache entry")?;
                    println!("{json}");
                }
                Some(entry) => {
                    if !cli.quiet {
                        eprintln!("{}", bold(&entry.source));
                    }
                    print_summary(&entry.result.summary)?;
                }
                None => {
                    if !cli.quiet {
                        eprintln!("No summary stored yet.");
                    }
                }
            }
        }
    }

    Ok(())
}

/// Map global CLI args to `SummarizerConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SummarizerConfig> {
    let mut builder = SummarizerConfig::builder()
        .provider_name(cli.provider.clone())
        .model(cli.model.clone())
        .download_timeout_secs(cli.download_timeout)
        .api_timeout_secs(cli.api_timeout);
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    builder.build().context("Invalid configuration")
}

/// Turn the command line into the same form the HTTP API receives, so both
/// surfaces share one validation path.
async fn build_form(args: &SummarizeArgs) -> Result<SummarizeForm> {
    let mut form = SummarizeForm {
        max_tokens: Some(args.max_tokens.to_string()),
        temperature: Some(args.temperature.to_string()),
        summary_style: Some(args.style.to_string()),
        output_language: Some(args.language.to_string()),
        ..Default::default()
    };

    if is_url(&args.input) {
        form.pdf_url = Some(args.input.clone());
        return Ok(form);
    }

    let path = Path::new(&args.input);
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if !has_pdf_signature(&bytes) {
        anyhow::bail!("{} is not a PDF file", path.display());
    }
    form.file = Some(UploadedFile {
        filename: upload_name(path),
        bytes: bytes.into(),
    });
    Ok(form)
}

/// Name sent with a local file. The file already passed the `%PDF-` check,
/// so a name without the `.pdf` extension gets one appended.
fn upload_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    if name.to_ascii_lowercase().ends_with(".pdf") {
        name
    } else {
        format!("{name}.pdf")
    }
}

fn is_url(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn print_summary(summary: &str) -> Result<()> {
    write_summary(&mut io::stdout().lock(), summary).context("Failed to write to stdout")
}

fn write_summary(out: &mut impl Write, summary: &str) -> io::Result<()> {
    out.write_all(summary.as_bytes())?;
    if !summary.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_summarizer::request::DEFAULT_MAX_UPLOAD_BYTES;
    use pdf_summarizer::validate;

    #[test]
    fn upload_name_keeps_pdf_extension() {
        assert_eq!(upload_name(Path::new("/tmp/report.pdf")), "report.pdf");
        assert_eq!(upload_name(Path::new("Scan.PDF")), "Scan.PDF");
    }

    #[test]
    fn upload_name_adds_extension_for_signed_files() {
        assert_eq!(upload_name(Path::new("/tmp/download")), "download.pdf");
        assert_eq!(upload_name(Path::new("paper.bin")), "paper.bin.pdf");
        assert_eq!(upload_name(Path::new("..")), "document.pdf");
    }

    #[test]
    fn extensionless_local_pdf_passes_validation() {
        let form = SummarizeForm {
            file: Some(UploadedFile {
                filename: upload_name(Path::new("/tmp/download")),
                bytes: b"%PDF-1.4 body".to_vec().into(),
            }),
            ..Default::default()
        };
        assert!(validate(form, DEFAULT_MAX_UPLOAD_BYTES).is_ok());
    }

    /// Accepts `room` bytes, then fails every write.
    struct ShortWriter {
        room: usize,
        written: Vec<u8>,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.room == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
            }
            let n = buf.len().min(self.room);
            self.room -= n;
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn summary_gets_trailing_newline() {
        let mut out = Vec::new();
        write_summary(&mut out, "Done.").unwrap();
        assert_eq!(out, b"Done.\n");

        let mut out = Vec::new();
        write_summary(&mut out, "Done.\n").unwrap();
        assert_eq!(out, b"Done.\n");
    }

    #[test]
    fn failed_newline_write_is_reported() {
        let mut out = ShortWriter {
            room: 5,
            written: Vec::new(),
        };
        let err = write_summary(&mut out, "Done.").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(out.written, b"Done.");
    }

    #[test]
    fn urls_are_told_apart_from_paths() {
        assert!(is_url("https://example.com/a.pdf"));
        assert!(is_url("HTTP://example.com/a.pdf"));
        assert!(!is_url("./https.pdf"));
        assert!(!is_url("/tmp/a.pdf"));
    }
}
