//! The `collect` stage: ranking pages → research document + report PDFs.
//!
//! Categories are visited in the configured order. Research is scraped
//! straight from its HTML table; every other category's page is mined for
//! PDF links which are downloaded one by one into
//! `reports_dir/<Category>/`.
//!
//! A page that cannot be fetched, or a report that fails to download, is
//! logged and skipped. Only local filesystem failures stop the stage.

use crate::category::Category;
use crate::config::PipelineConfig;
use crate::error::{ItemError, NirfError};
use crate::output::{CollectOutput, ItemFailure};
use crate::pipeline::fetch::{build_client, fetch_page, filename_for};
use crate::pipeline::harvest::{download_pdf, find_pdf_links};
use crate::pipeline::research::scrape_research_table;
use crate::progress::Reporter;
use crate::record::{save_document, CategoryDocument};
use reqwest::Url;
use std::time::Instant;
use tracing::{info, warn};

/// Run the collect stage.
///
/// # Errors
/// Returns `Err(NirfError)` when the HTTP client cannot be built, a report
/// directory cannot be created, or the research document cannot be written.
pub async fn collect(config: &PipelineConfig) -> Result<CollectOutput, NirfError> {
    let start = Instant::now();
    let client = build_client(config.http_timeout_secs)?;
    let mut output = CollectOutput::default();
    let mut research_doc = CategoryDocument::new();

    for &category in &config.collect_categories {
        let url = config.ranking_url(category)?;
        info!("{category}: fetching {url}");

        let html = match fetch_page(&client, &url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("{category}: ranking page unavailable, skipping: {e}");
                output.failures.push(failure(category, url.as_str(), e));
                continue;
            }
        };

        if category.has_html_table() {
            let records = scrape_research_table(&html);
            info!("{category}: scraped {} records", records.len());
            output.research_records += records.len();
            if !records.is_empty() {
                research_doc.insert(category.as_str().to_string(), records);
            }
        } else {
            download_reports(&client, config, category, &url, &html, &mut output).await?;
        }
    }

    if research_doc.is_empty() {
        info!("No research records; '{}' not written", config.research_json.display());
    } else {
        save_document(&research_doc, &config.research_json).await?;
        output.research_json = Some(config.research_json.clone());
    }

    output.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Collect finished: {} research records, {}/{} PDFs downloaded, {} failures",
        output.research_records,
        output.pdfs_downloaded,
        output.pdfs_found,
        output.failures.len()
    );
    Ok(output)
}

async fn download_reports(
    client: &reqwest::Client,
    config: &PipelineConfig,
    category: Category,
    page_url: &Url,
    html: &str,
    output: &mut CollectOutput,
) -> Result<(), NirfError> {
    let links = find_pdf_links(html, page_url);
    info!("{category}: {} PDF links", links.len());
    output.pdfs_found += links.len();
    if links.is_empty() {
        return Ok(());
    }

    let dir = config.category_dir(category);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| NirfError::OutputWriteFailed {
            path: dir.clone(),
            source: e,
        })?;

    let stage = format!("collect {category}");
    let reporter = Reporter::start(&stage, links.len(), config.progress_callback.as_ref());
    let mut downloaded = 0;

    for (i, link) in links.iter().enumerate() {
        let index = i + 1;
        let label = filename_for(link);
        reporter.item_start(index, &label);

        match download_pdf(client, link, &dir).await {
            Ok(_) => {
                downloaded += 1;
                reporter.item_complete(index, &label);
            }
            Err(e) => {
                warn!("{category}: skipping {label}: {e}");
                reporter.item_error(index, &label, &e.to_string());
                output.failures.push(failure(category, &label, e));
            }
        }
    }

    reporter.finish(downloaded);
    info!("{category}: downloaded {downloaded}/{} reports", links.len());
    output.pdfs_downloaded += downloaded;
    Ok(())
}

fn failure(category: Category, label: &str, error: ItemError) -> ItemFailure {
    ItemFailure {
        category: category.to_string(),
        label: label.to_string(),
        error,
    }
}
