//! Building blocks the three stages are assembled from.
//!
//! Each submodule does exactly one transformation and knows nothing about
//! stages, progress reporting or configuration.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ research ─────────────────────────────▶ reshape
//!   └─────▶ harvest ──▶ text ──▶ llm ──▶ reply ──────┘
//! (HTTP)   (links/PDF) (pdf-extract) (model) (JSON)  (pivot)
//! ```
//!
//! 1. [`fetch`]    — shared HTTP client, page and file fetching
//! 2. [`research`] — Research results table → records
//! 3. [`harvest`]  — PDF link discovery and download
//! 4. [`text`]     — PDF → plain text; runs in `spawn_blocking`
//! 5. [`llm`]      — text → record through a [`llm::FieldExtractor`]
//! 6. [`reply`]    — cleanup rules for raw model replies
//! 7. [`reshape`]  — records → template-ordered wide tables

pub mod fetch;
pub mod harvest;
pub mod llm;
pub mod reply;
pub mod research;
pub mod reshape;
pub mod text;
