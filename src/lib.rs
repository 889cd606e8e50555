//! # nirf-harvest
//!
//! Collect, extract and republish NIRF institutional ranking data.
//!
//! The NIRF site publishes one ranking page per category. Research results
//! sit in an HTML table; every other category links one PDF report per
//! institute. This crate turns both into per-category wide tables in a
//! Google spreadsheet.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ranking pages
//!  │
//!  ├─ 1. collect   Research table → research_data.json
//!  │               other pages    → nirf_reports/<Category>/*.pdf
//!  ├─ 2. extract   PDF → text → LLM → record        → nirf_data.json
//!  └─ 3. publish   merge → rename → pivot → reindex → one sheet per category
//! ```
//!
//! Stages share nothing but those files, so each can be re-run alone.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nirf_harvest::{collect, extract, publish, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from GEMINI_API_KEY / OPENAI_API_KEY / …
//!     let config = PipelineConfig::builder()
//!         .spreadsheet_name("NIRF Analysis 2025")
//!         .build()?;
//!     collect(&config).await?;
//!     let extracted = extract(&config).await?;
//!     eprintln!("{} documents extracted", extracted.documents_extracted);
//!     publish(&config).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `nirf` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! nirf-harvest = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod category;
pub mod collect;
pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod publish;
pub mod record;
pub mod run;
pub mod sheets;
pub mod templates;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use category::Category;
pub use collect::collect;
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::{ItemError, NirfError};
pub use extract::{extract, extract_with, resolve_provider};
pub use output::{
    CollectOutput, ExtractOutput, ItemFailure, PublishOutput, RunOutput, SheetSummary,
};
pub use pipeline::llm::{FieldExtractor, LlmFieldExtractor};
pub use pipeline::reshape::{reshape, WideTable};
pub use progress::{NoopProgressCallback, ProgressCallback, StageProgressCallback};
pub use publish::{publish, publish_with};
pub use record::{CategoryDocument, Record};
pub use run::run;
pub use sheets::{GoogleSheets, Spreadsheet, WorksheetState};
