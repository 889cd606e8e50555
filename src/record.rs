//! Records and the category-keyed JSON documents that carry them between
//! stages.
//!
//! Both intermediate files have the same shape:
//!
//! ```json
//! {
//!     "Overall": [ { "rank": "1", "institute_name": "…", … }, … ],
//!     "Research": [ … ]
//! }
//! ```
//!
//! Key order is preserved on load and save so a document round-trips
//! byte-for-byte through the pipeline.

use crate::category::Category;
use crate::error::NirfError;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// One institution's data within a category: metric key → scalar.
pub type Record = serde_json::Map<String, Value>;

/// Category name → ordered list of records.
pub type CategoryDocument = IndexMap<String, Vec<Record>>;

/// Records stored under `category`, or an empty slice.
pub fn records_for<'a>(doc: &'a CategoryDocument, category: Category) -> &'a [Record] {
    doc.get(category.as_str()).map(Vec::as_slice).unwrap_or(&[])
}

/// Load a category document from `path`.
///
/// A missing file is not an error: it yields an empty document and a
/// warning, so downstream stages run with whatever data does exist.
pub async fn load_document(path: &Path) -> Result<CategoryDocument, NirfError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("'{}' not found; continuing with an empty document", path.display());
            return Ok(CategoryDocument::new());
        }
        Err(e) => {
            return Err(NirfError::DocumentReadFailed {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let doc: CategoryDocument =
        serde_json::from_slice(&bytes).map_err(|e| NirfError::MalformedDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!(
        "Loaded '{}' ({} categories, {} records)",
        path.display(),
        doc.len(),
        doc.values().map(Vec::len).sum::<usize>()
    );
    Ok(doc)
}

/// Serialise a document the way the files have always looked: 4-space indent.
pub fn to_pretty_json(doc: &CategoryDocument) -> Result<Vec<u8>, NirfError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser)
        .map_err(|e| NirfError::Internal(format!("Failed to serialise document: {e}")))?;
    Ok(buf)
}

/// Write a document to `path`.
///
/// Uses atomic write (temp file + rename) so a crash never leaves a
/// half-written document for the next stage to choke on.
pub async fn save_document(doc: &CategoryDocument, path: &Path) -> Result<(), NirfError> {
    let bytes = to_pretty_json(doc)?;
    let write_err = |source| NirfError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, &bytes).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

    debug!("Wrote {} bytes to '{}'", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> CategoryDocument {
        let mut doc = CategoryDocument::new();
        let rec = json!({"rank": "1", "institute_name": "Alpha"});
        doc.insert(
            "Overall".into(),
            vec![rec.as_object().cloned().unwrap()],
        );
        doc.insert("University".into(), vec![]);
        doc
    }

    #[tokio::test]
    async fn missing_file_is_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let doc = load_document(&dir.path().join("absent.json")).await.unwrap();
        assert!(doc.is_empty());
    }

    #[tokio::test]
    async fn malformed_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, b"[1, 2, 3]").unwrap();
        let err = load_document(&path).await.unwrap_err();
        assert!(matches!(err, NirfError::MalformedDocument { .. }));
    }

    #[tokio::test]
    async fn save_then_load_keeps_category_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.json");
        save_document(&sample(), &path).await.unwrap();

        let loaded = load_document(&path).await.unwrap();
        let keys: Vec<_> = loaded.keys().cloned().collect();
        assert_eq!(keys, vec!["Overall", "University"]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn pretty_json_uses_four_spaces() {
        let text = String::from_utf8(to_pretty_json(&sample()).unwrap()).unwrap();
        assert!(text.contains("\n    \"Overall\": ["), "got:\n{text}");
    }

    #[test]
    fn records_for_absent_category_is_empty() {
        assert!(records_for(&sample(), Category::Law).is_empty());
        assert_eq!(records_for(&sample(), Category::Overall).len(), 1);
    }
}
