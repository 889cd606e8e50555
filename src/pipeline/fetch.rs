//! HTTP fetching for ranking pages and report PDFs.
//!
//! One `reqwest::Client` is built per stage and reused for every request.
//! Nothing here retries: a failed fetch becomes an [`ItemError`] and the
//! caller decides whether to skip the item.

use crate::error::{ItemError, NirfError};
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("nirf-harvest/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client.
pub fn build_client(timeout_secs: u64) -> Result<reqwest::Client, NirfError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| NirfError::HttpClient(e.to_string()))
}

/// Fetch `url` and return the raw response body.
///
/// Non-2xx statuses are failures.
pub async fn fetch_bytes(client: &reqwest::Client, url: &Url) -> Result<Vec<u8>, ItemError> {
    let fail = |detail: String| ItemError::FetchFailed {
        url: url.to_string(),
        detail,
    };

    let response = client.get(url.clone()).send().await.map_err(|e| {
        if e.is_timeout() {
            fail("request timed out".to_string())
        } else {
            fail(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(fail(format!("HTTP {}", response.status())));
    }

    let bytes = response.bytes().await.map_err(|e| fail(e.to_string()))?;
    debug!("Fetched {} bytes from {}", bytes.len(), url);
    Ok(bytes.to_vec())
}

/// Fetch `url` as text (lossy UTF-8; ranking pages occasionally carry stray bytes).
pub async fn fetch_page(client: &reqwest::Client, url: &Url) -> Result<String, ItemError> {
    let bytes = fetch_bytes(client, url).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Trailing path segment of `url`, used as the on-disk file name.
pub fn filename_for(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|last| !last.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "downloaded.pdf".to_string())
}

/// True when `bytes` begin with the `%PDF` magic.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}
