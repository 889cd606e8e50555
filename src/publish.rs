//! The `publish` stage: both documents → one worksheet per category.
//!
//! Loads the PDF and research documents (a missing file counts as empty),
//! reshapes them into wide tables and writes each table into the worksheet
//! named after its category: prepare, clear, write at A1.
//!
//! There is no rollback. A failure after a sheet was cleared leaves it
//! empty, and the run stops at the first failing table.

use crate::config::PipelineConfig;
use crate::error::NirfError;
use crate::output::{PublishOutput, SheetSummary};
use crate::pipeline::fetch::build_client;
use crate::pipeline::reshape::{reshape, WideTable};
use crate::progress::Reporter;
use crate::record::load_document;
use crate::sheets::{GoogleSheets, Spreadsheet};
use std::time::Instant;
use tracing::info;

/// Run the publish stage against the Google spreadsheet named in `config`.
///
/// Returns before authenticating when there is nothing to publish.
///
/// # Errors
/// Any document, credential, lookup or API failure is fatal.
pub async fn publish(config: &PipelineConfig) -> Result<PublishOutput, NirfError> {
    let start = Instant::now();
    let tables = load_tables(config).await?;
    if tables.is_empty() {
        info!("No data to publish");
        return Ok(PublishOutput::default());
    }

    let client = build_client(config.http_timeout_secs)?;
    let sheets =
        GoogleSheets::connect(client, &config.credentials_path, &config.spreadsheet_name).await?;
    let mut output = write_tables(config, &tables, &sheets).await?;
    output.duration_ms = start.elapsed().as_millis() as u64;
    Ok(output)
}

/// Run the publish stage against a caller-supplied spreadsheet.
pub async fn publish_with(
    config: &PipelineConfig,
    spreadsheet: &dyn Spreadsheet,
) -> Result<PublishOutput, NirfError> {
    let start = Instant::now();
    let tables = load_tables(config).await?;
    if tables.is_empty() {
        info!("No data to publish");
        return Ok(PublishOutput::default());
    }

    let mut output = write_tables(config, &tables, spreadsheet).await?;
    output.duration_ms = start.elapsed().as_millis() as u64;
    Ok(output)
}

async fn load_tables(config: &PipelineConfig) -> Result<Vec<WideTable>, NirfError> {
    let pdf_doc = load_document(&config.pdf_json).await?;
    let research_doc = load_document(&config.research_json).await?;
    Ok(reshape(&pdf_doc, &research_doc))
}

async fn write_tables(
    config: &PipelineConfig,
    tables: &[WideTable],
    spreadsheet: &dyn Spreadsheet,
) -> Result<PublishOutput, NirfError> {
    let reporter = Reporter::start("publish", tables.len(), config.progress_callback.as_ref());
    let mut output = PublishOutput::default();

    for (i, table) in tables.iter().enumerate() {
        let index = i + 1;
        let title = table.category.as_str();
        reporter.item_start(index, title);

        match write_table(table, spreadsheet).await {
            Ok(summary) => {
                info!(
                    "{title}: wrote {} institutes × {} rows",
                    summary.institutes, summary.rows
                );
                reporter.item_complete(index, title);
                output.sheets.push(summary);
            }
            Err(e) => {
                reporter.item_error(index, title, &e.to_string());
                reporter.finish(output.sheets.len());
                return Err(e);
            }
        }
    }

    reporter.finish(output.sheets.len());
    Ok(output)
}

async fn write_table(
    table: &WideTable,
    spreadsheet: &dyn Spreadsheet,
) -> Result<SheetSummary, NirfError> {
    let title = table.category.as_str();
    let grid = table.to_grid();
    let (rows, cols) = table.grid_size();

    let state = spreadsheet.prepare_worksheet(title, rows, cols).await?;
    spreadsheet.clear(title).await?;
    spreadsheet.write(title, &grid).await?;

    Ok(SheetSummary {
        title: title.to_string(),
        institutes: table.columns.len(),
        rows: table.rows.len(),
        state,
    })
}
