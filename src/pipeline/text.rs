//! PDF → plain text.
//!
//! `pdf-extract` is synchronous and CPU-bound, and it panics on some
//! malformed fonts. It runs inside `spawn_blocking` so the panic surfaces as
//! a `JoinError` and becomes a per-document [`ItemError`] instead of taking
//! the whole batch down.

use crate::error::ItemError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extract and tidy the text of the PDF at `path`.
///
/// A document that yields only whitespace is reported as [`ItemError::EmptyText`]
/// so the caller can skip the model call.
pub async fn extract_text(path: &Path) -> Result<String, ItemError> {
    let owned: PathBuf = path.to_path_buf();
    let fail = |detail: String| ItemError::TextExtractionFailed {
        path: path.to_path_buf(),
        detail,
    };

    let raw = tokio::task::spawn_blocking(move || {
        let bytes = std::fs::read(&owned).map_err(|e| e.to_string())?;
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| fail(format!("parser panicked: {e}")))?
    .map_err(fail)?;

    let text = clean_pdf_text(&raw);
    if text.is_empty() {
        return Err(ItemError::EmptyText {
            path: path.to_path_buf(),
        });
    }

    debug!("{}: {} chars of text", path.display(), text.len());
    Ok(text)
}

/// Drop blank lines, trim each line, and remove NUL / BOM artefacts.
pub fn clean_pdf_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim().replace(['\u{0}', '\u{FEFF}'], ""))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
