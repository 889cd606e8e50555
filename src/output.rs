//! Per-stage result summaries.
//!
//! Each stage returns one of these on success, even when individual items
//! failed; inspect `failures` to see what was skipped and why.

use crate::error::ItemError;
use crate::sheets::WorksheetState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One skipped item and the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFailure {
    /// Category the item belonged to.
    pub category: String,
    /// File name, URL or page the failure concerns.
    pub label: String,
    pub error: ItemError,
}

/// Result of the `collect` stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectOutput {
    /// Records scraped from the Research table.
    pub research_records: usize,
    /// `.pdf` links found across all report pages.
    pub pdfs_found: usize,
    /// Reports saved to disk.
    pub pdfs_downloaded: usize,
    /// Path of the research document, if one was written.
    pub research_json: Option<PathBuf>,
    /// Ranking pages and downloads that were skipped.
    pub failures: Vec<ItemFailure>,
    pub duration_ms: u64,
}

/// Result of the `extract` stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractOutput {
    /// PDFs attempted across all categories.
    pub documents_seen: usize,
    /// PDFs that produced a non-empty record.
    pub documents_extracted: usize,
    /// Records kept per category, in processing order.
    pub records_per_category: IndexMap<String, usize>,
    /// Path of the written PDF document.
    pub pdf_json: PathBuf,
    pub failures: Vec<ItemFailure>,
    pub duration_ms: u64,
}

/// One worksheet written by the `publish` stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetSummary {
    pub title: String,
    pub institutes: usize,
    pub rows: usize,
    pub state: WorksheetState,
}

/// Result of the `publish` stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishOutput {
    /// Worksheets written, in publish order. Empty when there was no data.
    pub sheets: Vec<SheetSummary>,
    pub duration_ms: u64,
}

/// Result of running all three stages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunOutput {
    pub collect: CollectOutput,
    pub extract: ExtractOutput,
    pub publish: PublishOutput,
}
