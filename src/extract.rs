//! The `extract` stage: report PDFs → category document of records.
//!
//! For each configured category, every PDF in `reports_dir/<Category>/` is
//! read oldest first, reduced to plain text and handed to a
//! [`FieldExtractor`]. Each non-empty record it returns is appended to the
//! category's list; a document that fails at any step contributes nothing.
//!
//! Calls are strictly sequential with a fixed pause before each one, which
//! keeps the run under the provider's rate limit without any retry logic.

use crate::category::Category;
use crate::config::PipelineConfig;
use crate::error::{ItemError, NirfError};
use crate::output::{ExtractOutput, ItemFailure};
use crate::pipeline::llm::{FieldExtractor, LlmFieldExtractor};
use crate::pipeline::text::extract_text;
use crate::progress::Reporter;
use crate::record::{save_document, CategoryDocument, Record};
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, info, warn};

/// Model used when only a Gemini key is available.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Run the extract stage with the model provider resolved from `config`.
///
/// # Errors
/// Returns `Err(NirfError::ProviderNotConfigured)` when no provider can be
/// resolved, or an output error when the document cannot be written.
pub async fn extract(config: &PipelineConfig) -> Result<ExtractOutput, NirfError> {
    let provider = resolve_provider(config).await?;
    debug!("LLM provider resolved");
    let extractor = LlmFieldExtractor::new(provider, config.temperature, config.max_tokens);
    extract_with(config, &extractor).await
}

/// Run the extract stage with a caller-supplied extractor.
pub async fn extract_with(
    config: &PipelineConfig,
    extractor: &dyn FieldExtractor,
) -> Result<ExtractOutput, NirfError> {
    let start = Instant::now();
    let mut output = ExtractOutput {
        pdf_json: config.pdf_json.clone(),
        ..Default::default()
    };
    let mut doc = CategoryDocument::new();

    for &category in &config.extract_categories {
        let mut pdfs = list_pdfs(&config.category_dir(category)).await;
        if let Some(max) = config.max_documents {
            pdfs.truncate(max);
        }
        info!("{category}: {} documents to process", pdfs.len());

        let records = extract_category(config, extractor, category, &pdfs, &mut output).await;
        output
            .records_per_category
            .insert(category.as_str().to_string(), records.len());
        doc.insert(category.as_str().to_string(), records);
    }

    save_document(&doc, &config.pdf_json).await?;

    output.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Extract finished: {}/{} documents yielded records, {} failures",
        output.documents_extracted,
        output.documents_seen,
        output.failures.len()
    );
    Ok(output)
}

async fn extract_category(
    config: &PipelineConfig,
    extractor: &dyn FieldExtractor,
    category: Category,
    pdfs: &[PathBuf],
    output: &mut ExtractOutput,
) -> Vec<Record> {
    let stage = format!("extract {category}");
    let reporter = Reporter::start(&stage, pdfs.len(), config.progress_callback.as_ref());
    let delay = Duration::from_millis(config.call_delay_ms);
    let mut records = Vec::new();

    for (i, path) in pdfs.iter().enumerate() {
        let index = i + 1;
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        reporter.item_start(index, &label);
        output.documents_seen += 1;

        match extract_document(extractor, category, path, delay).await {
            Ok(Some(record)) => {
                debug!("{category}: {label} → {} fields", record.len());
                records.push(record);
                output.documents_extracted += 1;
                reporter.item_complete(index, &label);
            }
            Ok(None) => {
                warn!("{category}: {label} produced an empty record");
                reporter.item_complete(index, &label);
            }
            Err(e) => {
                warn!("{category}: skipping {label}: {e}");
                reporter.item_error(index, &label, &e.to_string());
                output.failures.push(ItemFailure {
                    category: category.to_string(),
                    label,
                    error: e,
                });
            }
        }
    }

    reporter.finish(records.len());
    records
}

/// Text → record for one PDF. `Ok(None)` when the model returned `{}`.
async fn extract_document(
    extractor: &dyn FieldExtractor,
    category: Category,
    path: &Path,
    delay: Duration,
) -> Result<Option<Record>, ItemError> {
    let text = extract_text(path).await?;

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let record = extractor.extract_fields(&text, category.as_str()).await?;
    Ok((!record.is_empty()).then_some(record))
}

/// `.pdf` files directly inside `dir`, oldest modification time first.
///
/// A missing or unreadable directory yields no documents and a warning.
pub async fn list_pdfs(dir: &Path) -> Vec<PathBuf> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read '{}': {e}", dir.display());
            return Vec::new();
        }
    };

    let mut found: Vec<(SystemTime, PathBuf)> = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!("Error listing '{}': {e}", dir.display());
                break;
            }
        };

        let path = entry.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            continue;
        }
        let Ok(meta) = entry.metadata().await else {
            continue;
        };
        if meta.is_file() {
            found.push((meta.modified().unwrap_or(SystemTime::UNIX_EPOCH), path));
        }
    }

    found.sort();
    found.into_iter().map(|(_, path)| path).collect()
}

// ── Provider resolution ─────────────────────────────────────────────────────

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, NirfError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        NirfError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`), used as-is.
/// 2. **Named provider + model** (`config.provider_name`); the factory reads
///    the matching API key from the environment.
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`),
///    both non-empty.
/// 4. **`GEMINI_API_KEY`** present → Gemini with `config.model` or
///    [`DEFAULT_GEMINI_MODEL`].
/// 5. **Full auto-detection** (`ProviderFactory::from_env`).
pub async fn resolve_provider(config: &PipelineConfig) -> Result<Arc<dyn LLMProvider>, NirfError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL);
        return create_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Ok(gemini_key) = std::env::var("GEMINI_API_KEY") {
        if !gemini_key.is_empty() {
            let model = config.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL);
            return create_provider("gemini", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| NirfError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set GEMINI_API_KEY, OPENAI_API_KEY, or pass --provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_dir_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_pdfs(&dir.path().join("Overall")).await.is_empty());
    }

    #[tokio::test]
    async fn lists_only_pdf_files_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let older = dir.path().join("b.pdf");
        let newer = dir.path().join("a.PDF");
        std::fs::write(&older, b"%PDF-1.4").unwrap();
        std::fs::write(&newer, b"%PDF-1.4").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        std::fs::File::options()
            .write(true)
            .open(&older)
            .unwrap()
            .set_modified(base)
            .unwrap();
        std::fs::File::options()
            .write(true)
            .open(&newer)
            .unwrap()
            .set_modified(base + Duration::from_secs(60))
            .unwrap();

        assert_eq!(list_pdfs(dir.path()).await, vec![older, newer]);
    }
}
