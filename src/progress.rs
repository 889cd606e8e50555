//! Progress-callback trait for per-item stage events.
//!
//! Inject an [`Arc<dyn StageProgressCallback>`] via
//! [`crate::config::PipelineConfigBuilder::progress_callback`] to receive
//! events as each stage walks its items: PDF downloads in `collect`,
//! documents in `extract`, sheets in `publish`.
//!
//! # Example
//!
//! ```rust
//! use nirf_harvest::{PipelineConfig, StageProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     failed: AtomicUsize,
//! }
//!
//! impl StageProgressCallback for CountingCallback {
//!     fn on_item_error(&self, _stage: &str, _index: usize, _total: usize, label: &str, error: &str) {
//!         self.failed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{label}: {error}");
//!     }
//! }
//!
//! let cb = Arc::new(CountingCallback { failed: AtomicUsize::new(0) });
//! let config = PipelineConfig::builder()
//!     .progress_callback(cb as Arc<dyn StageProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the stages as they process each item.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `index` is 1-based; `label` is the file name,
/// document name or sheet title of the item.
pub trait StageProgressCallback: Send + Sync {
    /// Called once a stage knows how many items a batch contains.
    fn on_stage_start(&self, stage: &str, total: usize) {
        let _ = (stage, total);
    }

    /// Called just before an item is processed.
    fn on_item_start(&self, stage: &str, index: usize, total: usize, label: &str) {
        let _ = (stage, index, total, label);
    }

    /// Called when an item succeeds.
    fn on_item_complete(&self, stage: &str, index: usize, total: usize, label: &str) {
        let _ = (stage, index, total, label);
    }

    /// Called when an item fails and is skipped.
    fn on_item_error(&self, stage: &str, index: usize, total: usize, label: &str, error: &str) {
        let _ = (stage, index, total, label, error);
    }

    /// Called once after every item of the batch has been attempted.
    fn on_stage_complete(&self, stage: &str, total: usize, success_count: usize) {
        let _ = (stage, total, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl StageProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PipelineConfig`].
pub type ProgressCallback = Arc<dyn StageProgressCallback>;

/// Thin wrapper so stage code can fire events without `if let` noise.
pub(crate) struct Reporter<'a> {
    stage: &'a str,
    total: usize,
    cb: Option<&'a ProgressCallback>,
}

impl<'a> Reporter<'a> {
    pub(crate) fn start(stage: &'a str, total: usize, cb: Option<&'a ProgressCallback>) -> Self {
        if let Some(cb) = cb {
            cb.on_stage_start(stage, total);
        }
        Self { stage, total, cb }
    }

    pub(crate) fn item_start(&self, index: usize, label: &str) {
        if let Some(cb) = self.cb {
            cb.on_item_start(self.stage, index, self.total, label);
        }
    }

    pub(crate) fn item_complete(&self, index: usize, label: &str) {
        if let Some(cb) = self.cb {
            cb.on_item_complete(self.stage, index, self.total, label);
        }
    }

    pub(crate) fn item_error(&self, index: usize, label: &str, error: &str) {
        if let Some(cb) = self.cb {
            cb.on_item_error(self.stage, index, self.total, label, error);
        }
    }

    pub(crate) fn finish(&self, success_count: usize) {
        if let Some(cb) = self.cb {
            cb.on_stage_complete(self.stage, self.total, success_count);
        }
    }
}
