//! Error types for the nirf-harvest library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`NirfError`] — **Fatal**: the stage cannot proceed at all (missing
//!   credentials, spreadsheet not found, provider not configured, unreadable
//!   intermediate document). Returned as `Err(NirfError)` from the top-level
//!   stage functions.
//!
//! * [`ItemError`] — **Non-fatal**: a single download or document failed but
//!   the batch continues. Logged, counted in the stage output, and skipped.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the nirf-harvest library.
#[derive(Debug, Error)]
pub enum NirfError {
    // ── Document errors ───────────────────────────────────────────────────
    /// An intermediate JSON document exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    DocumentReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An intermediate JSON document is not a category-keyed object of record lists.
    #[error("'{path}' is not a valid category document: {source}")]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Spreadsheet errors ────────────────────────────────────────────────
    /// The service-account key file does not exist.
    #[error("Credentials file not found: '{path}'\nCreate a service account key and place it at this path.")]
    CredentialsNotFound { path: PathBuf },

    /// The key file exists but is not a usable service-account key.
    #[error("Invalid credentials file '{path}': {detail}")]
    InvalidCredentials { path: PathBuf, detail: String },

    /// Token exchange with the OAuth endpoint failed.
    #[error("Authentication failed: {detail}")]
    AuthFailed { detail: String },

    /// No spreadsheet with this exact name is visible to the service account.
    #[error("Spreadsheet '{name}' not found.\nShare it with the service account's client_email.")]
    SpreadsheetNotFound { name: String },

    /// A Sheets or Drive API call returned an error.
    #[error("Sheets API error during {operation}: {detail}")]
    SheetsApi { operation: String, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The shared HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single download or document.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ItemError {
    /// HTTP request failed or returned a non-success status.
    #[error("Failed to fetch '{url}': {detail}")]
    FetchFailed { url: String, detail: String },

    /// Downloaded bytes do not start with `%PDF`.
    #[error("'{url}' did not return a PDF (first bytes: {magic:?})")]
    NotAPdf { url: String, magic: Vec<u8> },

    /// Could not persist a downloaded file.
    #[error("Failed to write '{path}': {detail}")]
    WriteFailed { path: PathBuf, detail: String },

    /// The PDF parser failed or panicked.
    #[error("Text extraction failed for '{path}': {detail}")]
    TextExtractionFailed { path: PathBuf, detail: String },

    /// The PDF yielded no text; nothing to send to the model.
    #[error("No text recovered from '{path}'")]
    EmptyText { path: PathBuf },

    /// The model call itself failed.
    #[error("LLM call failed: {detail}")]
    LlmFailed { detail: String },

    /// The model replied with something that is not a JSON object.
    #[error("Malformed model reply: {detail} (reply starts: {excerpt:?})")]
    MalformedReply { detail: String, excerpt: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spreadsheet_not_found_display() {
        let e = NirfError::SpreadsheetNotFound {
            name: "NIRF Analysis".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("NIRF Analysis"), "got: {msg}");
        assert!(msg.contains("client_email"));
    }

    #[test]
    fn credentials_not_found_display() {
        let e = NirfError::CredentialsNotFound {
            path: PathBuf::from("credentials.json"),
        };
        assert!(e.to_string().contains("credentials.json"));
    }

    #[test]
    fn malformed_reply_display() {
        let e = ItemError::MalformedReply {
            detail: "expected a JSON object".into(),
            excerpt: "Sure! Here".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("expected a JSON object"));
        assert!(msg.contains("Sure! Here"));
    }

    #[test]
    fn item_error_serialises() {
        let e = ItemError::FetchFailed {
            url: "https://example.org/a.pdf".into(),
            detail: "HTTP 404".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("FetchFailed"));
        assert!(json.contains("HTTP 404"));
    }
}
