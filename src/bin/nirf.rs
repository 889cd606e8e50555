//! CLI binary for nirf-harvest.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `PipelineConfig`, runs one stage (or all three) and prints results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use nirf_harvest::{
    collect, extract, publish, run, Category, CollectOutput, ExtractOutput, PipelineConfig,
    ProgressCallback, PublishOutput, StageProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
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
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar per stage batch plus a log line per
/// item, printed above the bar.
struct CliProgressCallback {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: Mutex::new(None),
        })
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                f(bar);
            }
        }
    }
}

impl StageProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: &str, total: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len}  \
             ⏱ {elapsed_precise}  ETA {eta_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        let bar = ProgressBar::new(total as u64);
        bar.set_style(style);
        bar.set_prefix(stage.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("{stage}: {total} items"))
        ));

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_item_start(&self, _stage: &str, _index: usize, _total: usize, label: &str) {
        self.with_bar(|bar| bar.set_message(label.to_string()));
    }

    fn on_item_complete(&self, _stage: &str, index: usize, total: usize, label: &str) {
        self.with_bar(|bar| {
            bar.println(format!("  {} {:>4}/{:<4} {}", green("✓"), index, total, dim(label)));
            bar.inc(1);
        });
    }

    fn on_item_error(&self, _stage: &str, index: usize, total: usize, label: &str, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg: String = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };
        self.with_bar(|bar| {
            bar.println(format!(
                "  {} {:>4}/{:<4} {}  {}",
                red("✗"),
                index,
                total,
                label,
                red(&msg)
            ));
            bar.inc(1);
        });
    }

    fn on_stage_complete(&self, stage: &str, total: usize, success_count: usize) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }

        let failed = total.saturating_sub(success_count);
        if failed == 0 {
            eprintln!("{} {stage}: {} done", green("✔"), bold(&success_count.to_string()));
        } else {
            eprintln!(
                "{} {stage}: {}/{} done  ({} failed)",
                if success_count == 0 { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Scrape the Research table and download every report PDF
  nirf collect

  # Extract fields from the downloaded reports with Gemini
  GEMINI_API_KEY=... nirf extract

  # Trial run on three documents per category
  nirf extract --max-documents 3

  # Publish both JSON documents to the spreadsheet
  nirf publish --spreadsheet "NIRF Analysis 2025" --credentials credentials.json

  # Everything, for the 2024 rankings
  nirf run --year 2024

FILES:
  nirf_reports/<Category>/*.pdf   downloaded reports         (collect → extract)
  research_data.json              Research table records     (collect → publish)
  nirf_data.json                  extracted report records   (extract → publish)
  credentials.json                Google service-account key (publish)

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (default provider)
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (gemini, openai, anthropic, ollama)
  EDGEQUAKE_MODEL         Override model ID
  RUST_LOG                Override log filter (e.g. nirf_harvest=debug)

SETUP:
  1. Create a Google service account, download its key as credentials.json.
  2. Share the target spreadsheet with the key's client_email.
  3. Set an LLM API key:   export GEMINI_API_KEY=...
  4. Run:                   nirf run
"#;

/// Collect, extract and publish NIRF ranking data.
#[derive(Parser, Debug)]
#[command(
    name = "nirf",
    version,
    about = "Collect, extract and publish NIRF ranking data",
    long_about = "Scrape NIRF ranking pages, extract institutional metrics from the \
linked PDF reports with an LLM, and publish per-category wide tables to a Google spreadsheet.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// NIRF site root.
    #[arg(long, global = true, env = "NIRF_BASE_URL", default_value = "https://www.nirfindia.org")]
    base_url: String,

    /// Ranking year.
    #[arg(long, global = true, env = "NIRF_YEAR", default_value_t = 2025)]
    year: u16,

    /// Directory for downloaded reports (one subdirectory per category).
    #[arg(long, global = true, env = "NIRF_REPORTS_DIR", default_value = "nirf_reports")]
    reports_dir: PathBuf,

    /// Research table document.
    #[arg(long, global = true, env = "NIRF_RESEARCH_JSON", default_value = "research_data.json")]
    research_json: PathBuf,

    /// Extracted report document.
    #[arg(long, global = true, env = "NIRF_PDF_JSON", default_value = "nirf_data.json")]
    pdf_json: PathBuf,

    /// Categories to collect, comma-separated.
    #[arg(long, global = true, env = "NIRF_COLLECT_CATEGORIES", value_delimiter = ',',
          value_parser = Category::from_str)]
    collect_categories: Vec<Category>,

    /// Categories to extract, comma-separated.
    #[arg(long, global = true, env = "NIRF_EXTRACT_CATEGORIES", value_delimiter = ',',
          value_parser = Category::from_str)]
    extract_categories: Vec<Category>,

    /// Process at most this many PDFs per category.
    #[arg(long, global = true, env = "NIRF_MAX_DOCUMENTS")]
    max_documents: Option<usize>,

    /// Pause before each model call, in milliseconds.
    #[arg(long, global = true, env = "NIRF_CALL_DELAY_MS", default_value_t = 1000)]
    call_delay_ms: u64,

    /// LLM model ID (e.g. gemini-2.5-flash, gpt-4.1-mini).
    #[arg(long, global = true, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: gemini, openai, anthropic, ollama, azure.
    #[arg(long, global = true, env = "EDGEQUAKE_PROVIDER")]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, global = true, env = "NIRF_TEMPERATURE", default_value_t = 0.0)]
    temperature: f32,

    /// Max LLM output tokens per document.
    #[arg(long, global = true, env = "NIRF_MAX_TOKENS", default_value_t = 8192)]
    max_tokens: usize,

    /// Name of the target Google spreadsheet.
    #[arg(long, global = true, env = "NIRF_SPREADSHEET", default_value = "NIRF Analysis 2025")]
    spreadsheet: String,

    /// Google service-account key file.
    #[arg(long, global = true, env = "NIRF_CREDENTIALS", default_value = "credentials.json")]
    credentials: PathBuf,

    /// HTTP timeout in seconds.
    #[arg(long, global = true, env = "NIRF_HTTP_TIMEOUT", default_value_t = 120)]
    http_timeout: u64,

    /// Print the stage summary as JSON on stdout.
    #[arg(long, global = true, env = "NIRF_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, global = true, env = "NIRF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "NIRF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "NIRF_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Scrape the Research table and download report PDFs.
    Collect,
    /// Extract fields from downloaded PDFs with an LLM.
    Extract,
    /// Publish both documents to the spreadsheet.
    Publish,
    /// Collect, extract and publish in one go.
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
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

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn StageProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run stage(s) ─────────────────────────────────────────────────────
    match cli.command {
        Command::Collect => {
            let out = collect(&config).await.context("Collect failed")?;
            report(&cli, &out, || print_collect(&out))?;
        }
        Command::Extract => {
            let out = extract(&config).await.context("Extract failed")?;
            report(&cli, &out, || print_extract(&out))?;
        }
        Command::Publish => {
            let out = publish(&config).await.context("Publish failed")?;
            report(&cli, &out, || print_publish(&out))?;
        }
        Command::Run => {
            let out = run(&config).await.context("Run failed")?;
            report(&cli, &out, || {
                print_collect(&out.collect);
                print_extract(&out.extract);
                print_publish(&out.publish);
            })?;
        }
    }

    Ok(())
}

/// Map CLI args to `PipelineConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<PipelineConfig> {
    let mut builder = PipelineConfig::builder()
        .base_url(&cli.base_url)
        .year(cli.year)
        .reports_dir(&cli.reports_dir)
        .research_json(&cli.research_json)
        .pdf_json(&cli.pdf_json)
        .max_documents(cli.max_documents)
        .call_delay_ms(cli.call_delay_ms)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .spreadsheet_name(&cli.spreadsheet)
        .credentials_path(&cli.credentials)
        .http_timeout_secs(cli.http_timeout);

    if !cli.collect_categories.is_empty() {
        builder = builder.collect_categories(cli.collect_categories.clone());
    }
    if !cli.extract_categories.is_empty() {
        builder = builder.extract_categories(cli.extract_categories.clone());
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Print `out` as JSON, or the human summary unless quiet.
fn report<T: serde::Serialize>(cli: &Cli, out: &T, human: impl FnOnce()) -> Result<()> {
    if cli.json {
        let json = serde_json::to_string_pretty(out).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        human();
    }
    Ok(())
}

fn print_collect(out: &CollectOutput) {
    eprintln!(
        "{}  collect: {} research records, {}/{} PDFs  {}ms",
        if out.failures.is_empty() { green("✔") } else { cyan("⚠") },
        out.research_records,
        out.pdfs_downloaded,
        out.pdfs_found,
        out.duration_ms,
    );
    if let Some(ref path) = out.research_json {
        eprintln!("   {}", dim(&format!("→ {}", path.display())));
    }
}

fn print_extract(out: &ExtractOutput) {
    eprintln!(
        "{}  extract: {}/{} documents  {}ms  →  {}",
        if out.failures.is_empty() { green("✔") } else { cyan("⚠") },
        out.documents_extracted,
        out.documents_seen,
        out.duration_ms,
        bold(&out.pdf_json.display().to_string()),
    );
    for (category, count) in &out.records_per_category {
        eprintln!("   {}", dim(&format!("{category}: {count} records")));
    }
}

fn print_publish(out: &PublishOutput) {
    if out.sheets.is_empty() {
        eprintln!("{}  publish: no data", cyan("⚠"));
        return;
    }
    eprintln!(
        "{}  publish: {} sheets  {}ms",
        green("✔"),
        out.sheets.len(),
        out.duration_ms
    );
    for sheet in &out.sheets {
        eprintln!(
            "   {}",
            dim(&format!(
                "{}: {} institutes × {} rows ({:?})",
                sheet.title, sheet.institutes, sheet.rows, sheet.state
            ))
        );
    }
}
