//! YAML configuration file support.
//!
//! Every stage of the comparison pipeline can be tuned from one YAML file.
//! Missing sections and fields fall back to the defaults shown below, and
//! command-line flags override whatever the file says.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "thesis screening"
//!
//! canonical:
//!   min_token_len: 2
//!   fold_compatibility: false
//!
//! perceptual:
//!   shingle_size: 5
//!   use_parallel: true
//!
//! store:
//!   backend: "redb"
//!   path: "plagiarism_cache/doc_reps.redb"
//!   compression: "zstd"
//!   compression_level: 3
//!   fingerprint: "metadata"
//!   excerpt_chars: 400
//!
//! extract:
//!   recognize_images: true
//!   ocr_command: "tesseract stdin stdout"
//!   recognition_timeout_secs: 30
//!   parallel: true
//!
//! report:
//!   output_dir: "visualizations"
//!   max_paragraph_chars: 3000
//!   paragraphs_per_page: 12
//!
//! matcher:
//!   parallel: true
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use canonical::CanonicalizeConfig;
use index::{BackendConfig, CompressionCodec, CompressionConfig, FingerprintMode, RepositoryConfig};
use ingest::{CommandRecognizer, ExtractConfig, NoopRecognizer, Recognizer};
use matcher::{HtmlReportRenderer, MatcherConfig};
use perceptual::PerceptualConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlagiaryConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub canonical: CanonicalYamlConfig,

    #[serde(default)]
    pub perceptual: PerceptualYamlConfig,

    #[serde(default)]
    pub store: StoreYamlConfig,

    #[serde(default)]
    pub extract: ExtractYamlConfig,

    #[serde(default)]
    pub report: ReportYamlConfig,

    #[serde(default)]
    pub matcher: MatchYamlConfig,
}

impl PlagiaryConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PlagiaryConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration. Call again after applying overrides.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.canonical.validate()?;
        self.perceptual.validate()?;
        self.store.validate()?;
        self.extract.validate()?;
        self.report.validate()?;

        Ok(())
    }

    pub fn canonicalize_config(&self) -> CanonicalizeConfig {
        CanonicalizeConfig::new()
            .with_min_token_len(self.canonical.min_token_len)
            .with_fold_compatibility(self.canonical.fold_compatibility)
    }

    pub fn perceptual_config(&self) -> PerceptualConfig {
        PerceptualConfig::new()
            .with_k(self.perceptual.shingle_size)
            .with_parallel(self.perceptual.use_parallel)
    }

    pub fn extract_config(&self) -> ExtractConfig {
        ExtractConfig::default()
            .with_recognize_images(self.extract.recognize_images)
            .with_recognition_timeout(self.extract.recognition_timeout_secs.map(Duration::from_secs))
            .with_parallel(self.extract.parallel)
            .with_max_document_bytes(self.extract.max_document_bytes)
    }

    pub fn repository_config(&self) -> RepositoryConfig {
        RepositoryConfig::new()
            .with_backend(self.store.backend_config())
            .with_compression(self.store.compression_config())
            .with_fingerprint(self.store.fingerprint_mode())
            .with_canonical(self.canonicalize_config())
            .with_perceptual(self.perceptual_config())
            .with_extract(self.extract_config())
            .with_excerpt_chars(self.store.excerpt_chars)
    }

    /// The configured OCR engine, or a no-op when recognition is disabled.
    pub fn recognizer(&self) -> Arc<dyn Recognizer> {
        if !self.extract.recognize_images {
            return Arc::new(NoopRecognizer);
        }
        match CommandRecognizer::from_command_line(&self.extract.ocr_command) {
            Some(command) => Arc::new(command),
            None => Arc::new(NoopRecognizer),
        }
    }

    pub fn html_renderer(&self) -> HtmlReportRenderer {
        HtmlReportRenderer {
            max_paragraph_chars: self.report.max_paragraph_chars,
            paragraphs_per_page: self.report.paragraphs_per_page,
        }
    }

    pub fn matcher_config(&self) -> MatcherConfig {
        MatcherConfig::default()
            .with_parallel(self.matcher.parallel)
            .with_output_dir(&self.report.output_dir)
    }
}

impl Default for PlagiaryConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            canonical: CanonicalYamlConfig::default(),
            perceptual: PerceptualYamlConfig::default(),
            store: StoreYamlConfig::default(),
            extract: ExtractYamlConfig::default(),
            report: ReportYamlConfig::default(),
            matcher: MatchYamlConfig::default(),
        }
    }
}

/// Normalization and tokenization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalYamlConfig {
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,

    #[serde(default)]
    pub fold_compatibility: bool,
}

impl CanonicalYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.min_token_len == 0 {
            return Err(ConfigLoadError::Validation(
                "canonical.min_token_len must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CanonicalYamlConfig {
    fn default() -> Self {
        Self {
            min_token_len: default_min_token_len(),
            fold_compatibility: false,
        }
    }
}

/// Shingling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerceptualYamlConfig {
    #[serde(default = "default_shingle_size")]
    pub shingle_size: usize,

    #[serde(default = "true_value")]
    pub use_parallel: bool,
}

impl PerceptualYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.shingle_size == 0 {
            return Err(ConfigLoadError::Validation(
                "perceptual.shingle_size must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PerceptualYamlConfig {
    fn default() -> Self {
        Self {
            shingle_size: default_shingle_size(),
            use_parallel: true,
        }
    }
}

/// Persisted representation store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreYamlConfig {
    #[serde(default = "default_backend")]
    pub backend: String,

    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    #[serde(default = "default_compression")]
    pub compression: String,

    #[serde(default = "default_compression_level")]
    pub compression_level: i32,

    #[serde(default = "default_fingerprint")]
    pub fingerprint: String,

    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,
}

impl StoreYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        let valid_backends = ["redb", "in_memory"];
        if !valid_backends.contains(&self.backend.as_str()) {
            return Err(ConfigLoadError::Validation(format!(
                "store.backend must be one of: {valid_backends:?}"
            )));
        }

        if self.backend == "redb" && self.path.as_os_str().is_empty() {
            return Err(ConfigLoadError::Validation(
                "store.path is required when backend is 'redb'".to_string(),
            ));
        }

        let valid_codecs = ["zstd", "none"];
        if !valid_codecs.contains(&self.compression.as_str()) {
            return Err(ConfigLoadError::Validation(format!(
                "store.compression must be one of: {valid_codecs:?}"
            )));
        }

        if !(1..=22).contains(&self.compression_level) {
            return Err(ConfigLoadError::Validation(
                "store.compression_level must be between 1 and 22".to_string(),
            ));
        }

        let valid_modes = ["metadata", "content"];
        if !valid_modes.contains(&self.fingerprint.as_str()) {
            return Err(ConfigLoadError::Validation(format!(
                "store.fingerprint must be one of: {valid_modes:?}"
            )));
        }

        Ok(())
    }

    fn backend_config(&self) -> BackendConfig {
        match self.backend.as_str() {
            "in_memory" => BackendConfig::in_memory(),
            _ => BackendConfig::redb(&self.path),
        }
    }

    fn compression_config(&self) -> CompressionConfig {
        let codec = match self.compression.as_str() {
            "none" => CompressionCodec::None,
            _ => CompressionCodec::Zstd,
        };
        CompressionConfig::new(codec, self.compression_level)
    }

    fn fingerprint_mode(&self) -> FingerprintMode {
        match self.fingerprint.as_str() {
            "content" => FingerprintMode::Content,
            _ => FingerprintMode::Metadata,
        }
    }
}

impl Default for StoreYamlConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_store_path(),
            compression: default_compression(),
            compression_level: default_compression_level(),
            fingerprint: default_fingerprint(),
            excerpt_chars: default_excerpt_chars(),
        }
    }
}

/// Text extraction and OCR
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractYamlConfig {
    #[serde(default = "true_value")]
    pub recognize_images: bool,

    /// Program and arguments; the image arrives on stdin, text is read from stdout.
    #[serde(default = "default_ocr_command")]
    pub ocr_command: String,

    #[serde(default = "default_recognition_timeout")]
    pub recognition_timeout_secs: Option<u64>,

    #[serde(default = "true_value")]
    pub parallel: bool,

    #[serde(default)]
    pub max_document_bytes: Option<u64>,
}

impl ExtractYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.recognition_timeout_secs == Some(0) {
            return Err(ConfigLoadError::Validation(
                "extract.recognition_timeout_secs must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExtractYamlConfig {
    fn default() -> Self {
        Self {
            recognize_images: true,
            ocr_command: default_ocr_command(),
            recognition_timeout_secs: default_recognition_timeout(),
            parallel: true,
            max_document_bytes: None,
        }
    }
}

/// Highlighted report output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportYamlConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_max_paragraph_chars")]
    pub max_paragraph_chars: usize,

    #[serde(default = "default_paragraphs_per_page")]
    pub paragraphs_per_page: usize,
}

impl ReportYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.max_paragraph_chars == 0 {
            return Err(ConfigLoadError::Validation(
                "report.max_paragraph_chars must be >= 1".to_string(),
            ));
        }
        if self.paragraphs_per_page == 0 {
            return Err(ConfigLoadError::Validation(
                "report.paragraphs_per_page must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ReportYamlConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_paragraph_chars: default_max_paragraph_chars(),
            paragraphs_per_page: default_paragraphs_per_page(),
        }
    }
}

/// Comparison orchestration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchYamlConfig {
    #[serde(default = "true_value")]
    pub parallel: bool,
}

impl Default for MatchYamlConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

// Helper functions for serde defaults
fn true_value() -> bool {
    true
}
fn default_min_token_len() -> usize {
    canonical::DEFAULT_MIN_TOKEN_LEN
}
fn default_shingle_size() -> usize {
    perceptual::DEFAULT_SHINGLE_SIZE
}
fn default_backend() -> String {
    "redb".to_string()
}
fn default_store_path() -> PathBuf {
    PathBuf::from("plagiarism_cache/doc_reps.redb")
}
fn default_compression() -> String {
    "zstd".to_string()
}
fn default_compression_level() -> i32 {
    3
}
fn default_fingerprint() -> String {
    "metadata".to_string()
}
fn default_excerpt_chars() -> usize {
    index::DEFAULT_EXCERPT_CHARS
}
fn default_ocr_command() -> String {
    "tesseract stdin stdout".to_string()
}
fn default_recognition_timeout() -> Option<u64> {
    Some(30)
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(matcher::DEFAULT_OUTPUT_DIR)
}
fn default_max_paragraph_chars() -> usize {
    matcher::DEFAULT_MAX_PARAGRAPH_CHARS
}
fn default_paragraphs_per_page() -> usize {
    matcher::DEFAULT_PARAGRAPHS_PER_PAGE
}
