//! PDF link harvesting for the report-based categories.
//!
//! Every ranking page except Research lists one PDF report per institute.
//! [`find_pdf_links`] collects them; [`download_pdf`] saves one into the
//! category's report directory under its URL file name.

use super::fetch::{fetch_bytes, filename_for, is_pdf};
use crate::error::ItemError;
use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Link targets ending in this suffix are treated as reports.
pub const PDF_SUFFIX: &str = ".pdf";

static LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Absolute URLs of every `.pdf` link on the page, in document order.
///
/// Relative hrefs are resolved against `page_url`. Repeated links are kept
/// once; hrefs that cannot be resolved are dropped.
pub fn find_pdf_links(html: &str, page_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();

    document
        .select(&LINKS)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| href.ends_with(PDF_SUFFIX))
        .filter_map(|href| page_url.join(href).ok())
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Download `url` into `dir`, returning the written path.
///
/// The body must look like a PDF; an HTML error page served with status 200
/// is rejected instead of being saved under a `.pdf` name.
pub async fn download_pdf(
    client: &reqwest::Client,
    url: &Url,
    dir: &Path,
) -> Result<PathBuf, ItemError> {
    let bytes = fetch_bytes(client, url).await?;
    if !is_pdf(&bytes) {
        return Err(ItemError::NotAPdf {
            url: url.to_string(),
            magic: bytes.iter().take(4).copied().collect(),
        });
    }

    let path = dir.join(filename_for(url));
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| ItemError::WriteFailed {
            path: path.clone(),
            detail: e.to_string(),
        })?;

    debug!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://www.nirfindia.org/Rankings/2025/OverallRanking.html").unwrap()
    }

    #[test]
    fn resolves_relative_and_absolute_links() {
        let html = r#"
            <a href="/nirfpdfcdn/2025/pdf/Overall/IR-O-U-0001.pdf">PDF</a>
            <a href="pdf/IR-O-U-0002.pdf">PDF</a>
            <a href="https://cdn.example.org/IR-O-U-0003.pdf">PDF</a>
        "#;
        let links: Vec<String> = find_pdf_links(html, &page_url())
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            links,
            vec![
                "https://www.nirfindia.org/nirfpdfcdn/2025/pdf/Overall/IR-O-U-0001.pdf",
                "https://www.nirfindia.org/Rankings/2025/pdf/IR-O-U-0002.pdf",
                "https://cdn.example.org/IR-O-U-0003.pdf",
            ]
        );
    }

    #[test]
    fn ignores_non_pdf_links_and_anchors_without_href() {
        let html = r#"
            <a href="/Rankings/2025/EngineeringRanking.html">Engineering</a>
            <a name="top">top</a>
            <a href="/report.pdf.html">not a pdf</a>
            <a href="/report.pdf">pdf</a>
        "#;
        let links = find_pdf_links(html, &page_url());
        assert_eq!(links.len(), 1);
        assert!(links[0].as_str().ends_with("/report.pdf"));
    }

    #[test]
    fn repeated_links_are_kept_once() {
        let html = r#"<a href="/a.pdf">1</a><a href="/b.pdf">2</a><a href="/a.pdf">3</a>"#;
        let links = find_pdf_links(html, &page_url());
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn page_without_links_is_empty() {
        assert!(find_pdf_links("<html><body>No reports yet</body></html>", &page_url()).is_empty());
    }
}
