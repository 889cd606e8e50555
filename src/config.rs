//! Configuration for the three pipeline stages.
//!
//! Every knob lives in [`PipelineConfig`], built via its
//! [`PipelineConfigBuilder`]. The defaults reproduce the production run:
//! the 2025 rankings on nirfindia.org, reports under `nirf_reports/`, and
//! the two intermediate JSON files in the working directory.

use crate::category::Category;
use crate::error::NirfError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration shared by `collect`, `extract` and `publish`.
///
/// # Example
/// ```rust
/// use nirf_harvest::{Category, PipelineConfig};
///
/// let config = PipelineConfig::builder()
///     .year(2024)
///     .extract_categories(vec![Category::Overall])
///     .spreadsheet_name("NIRF 2024")
///     .build()
///     .unwrap();
/// assert_eq!(config.year, 2024);
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    // ── collect ──────────────────────────────────────────────────────────
    /// Site root that ranking paths are resolved against.
    pub base_url: String,

    /// Ranking year used in page paths. Default: 2025.
    pub year: u16,

    /// Categories visited by the collector, in order.
    pub collect_categories: Vec<Category>,

    /// Root directory for downloaded reports (`<root>/<Category>/*.pdf`).
    pub reports_dir: PathBuf,

    /// Output of the Research table scrape.
    pub research_json: PathBuf,

    /// Per-request HTTP timeout in seconds. Default: 120.
    pub http_timeout_secs: u64,

    // ── extract ──────────────────────────────────────────────────────────
    /// Categories whose reports are sent to the model, in order.
    pub extract_categories: Vec<Category>,

    /// Output of the extractor; also the primary input of `publish`.
    pub pdf_json: PathBuf,

    /// Optional cap on documents per category. Default: no cap.
    ///
    /// Meant for trial runs against a paid model; production runs leave it unset.
    pub max_documents: Option<usize>,

    /// Pause before each model call in milliseconds. Default: 1000.
    ///
    /// A plain rate-limit courtesy for free-tier API keys, not a scheduler.
    pub call_delay_ms: u64,

    /// LLM model identifier, e.g. "gemini-2.5-flash".
    pub model: Option<String>,

    /// LLM provider name (e.g. "gemini", "openai").
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature. Default: 0.0.
    pub temperature: f32,

    /// Maximum tokens per model reply. Default: 8192.
    pub max_tokens: usize,

    // ── publish ──────────────────────────────────────────────────────────
    /// Exact title of the target spreadsheet.
    pub spreadsheet_name: String,

    /// Google service-account key file.
    pub credentials_path: PathBuf,

    /// Optional progress callback for per-item events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.nirfindia.org".to_string(),
            year: 2025,
            collect_categories: Category::COLLECT_ORDER.to_vec(),
            reports_dir: PathBuf::from("nirf_reports"),
            research_json: PathBuf::from("research_data.json"),
            http_timeout_secs: 120,
            extract_categories: Category::EXTRACT_DEFAULT.to_vec(),
            pdf_json: PathBuf::from("nirf_data.json"),
            max_documents: None,
            call_delay_ms: 1000,
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.0,
            max_tokens: 8192,
            spreadsheet_name: "NIRF Analysis 2025".to_string(),
            credentials_path: PathBuf::from("credentials.json"),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("base_url", &self.base_url)
            .field("year", &self.year)
            .field("collect_categories", &self.collect_categories)
            .field("reports_dir", &self.reports_dir)
            .field("research_json", &self.research_json)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("extract_categories", &self.extract_categories)
            .field("pdf_json", &self.pdf_json)
            .field("max_documents", &self.max_documents)
            .field("call_delay_ms", &self.call_delay_ms)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("spreadsheet_name", &self.spreadsheet_name)
            .field("credentials_path", &self.credentials_path)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn StageProgressCallback>"),
            )
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }

    /// Absolute URL of `category`'s ranking page.
    pub fn ranking_url(&self, category: Category) -> Result<reqwest::Url, NirfError> {
        let base = reqwest::Url::parse(&self.base_url)
            .map_err(|e| NirfError::InvalidConfig(format!("base URL '{}': {e}", self.base_url)))?;
        base.join(&category.ranking_path(self.year))
            .map_err(|e| NirfError::InvalidConfig(format!("ranking path for {category}: {e}")))
    }

    /// Directory holding `category`'s downloaded reports.
    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.reports_dir.join(category.as_str())
    }
}

/// Builder for [`PipelineConfig`].
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn year(mut self, year: u16) -> Self {
        self.config.year = year;
        self
    }

    pub fn collect_categories(mut self, categories: Vec<Category>) -> Self {
        self.config.collect_categories = categories;
        self
    }

    pub fn reports_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.reports_dir = dir.into();
        self
    }

    pub fn research_json(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.research_json = path.into();
        self
    }

    pub fn http_timeout_secs(mut self, secs: u64) -> Self {
        self.config.http_timeout_secs = secs;
        self
    }

    pub fn extract_categories(mut self, categories: Vec<Category>) -> Self {
        self.config.extract_categories = categories;
        self
    }

    pub fn pdf_json(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdf_json = path.into();
        self
    }

    pub fn max_documents(mut self, n: Option<usize>) -> Self {
        self.config.max_documents = n;
        self
    }

    pub fn call_delay_ms(mut self, ms: u64) -> Self {
        self.config.call_delay_ms = ms;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn spreadsheet_name(mut self, name: impl Into<String>) -> Self {
        self.config.spreadsheet_name = name.into();
        self
    }

    pub fn credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.credentials_path = path.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, NirfError> {
        let c = &self.config;
        let base = reqwest::Url::parse(&c.base_url)
            .map_err(|e| NirfError::InvalidConfig(format!("base URL '{}': {e}", c.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(NirfError::InvalidConfig(format!(
                "base URL must be http(s), got '{}'",
                c.base_url
            )));
        }
        if c.spreadsheet_name.trim().is_empty() {
            return Err(NirfError::InvalidConfig(
                "Spreadsheet name must not be empty".into(),
            ));
        }
        if c.max_documents == Some(0) {
            return Err(NirfError::InvalidConfig(
                "max_documents must be ≥ 1 when set".into(),
            ));
        }
        if c.http_timeout_secs == 0 {
            return Err(NirfError::InvalidConfig(
                "HTTP timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
