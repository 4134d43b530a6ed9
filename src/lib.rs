//! Workspace umbrella crate for near-duplicate text detection.
//!
//! This crate stitches together extraction, canonicalization, shingling, the
//! document repository and the matcher so callers can go from two file paths
//! to a similarity score and two highlighted reports with one configuration
//! value.
//!
//! ```no_run
//! use std::path::Path;
//! use plagiary::{compare_files, PlagiaryConfig};
//!
//! let cfg = PlagiaryConfig::default();
//! let report = compare_files(Path::new("essay.pdf"), Path::new("source.pdf"), &cfg)?;
//! println!("{:.2}%", report.similarity * 100.0);
//! # Ok::<(), plagiary::PipelineError>(())
//! ```

pub mod config;

pub use canonical::{
    canonicalize, normalize_text, tokenize, CanonicalizeConfig, CanonicalizedText, Token,
};
pub use index::{
    compute_fingerprint, BackendConfig, CompressionCodec, CompressionConfig, DocRepresentation,
    DocumentId, FingerprintMode, Repository, RepositoryConfig, RepositoryError, StoreBackend,
    StoreError,
};
pub use ingest::{
    extract_text, CommandRecognizer, ExtractConfig, ExtractError, Extractor, FileExtractor,
    NoopRecognizer, Recognizer,
};
pub use matcher::{
    compare_representations, Comparator, ComparisonReport, ComparisonResult, HtmlReportRenderer,
    MatchError, MatcherConfig, ReportRenderer, Segment,
};
pub use perceptual::{build_shingles, jaccard, PerceptualConfig, PerceptualError, Shingles};

pub use crate::config::{ConfigLoadError, PlagiaryConfig};

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

/// Errors that can occur while wiring up or running a comparison.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigLoadError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Open the repository described by `cfg` with the file extractor and the
/// configured OCR engine.
pub fn open_repository(cfg: &PlagiaryConfig) -> Result<Repository, PipelineError> {
    let repo = Repository::open(
        cfg.repository_config(),
        Arc::new(FileExtractor::new()),
        cfg.recognizer(),
    )?;
    info!(
        documents = repo.len(),
        shingle_size = repo.shingle_size(),
        "repository_opened"
    );
    Ok(repo)
}

/// Build a comparator writing HTML reports over a freshly opened repository.
pub fn build_comparator(cfg: &PlagiaryConfig) -> Result<Comparator, PipelineError> {
    cfg.validate()?;
    let repo = open_repository(cfg)?;
    Ok(Comparator::new(
        Arc::new(repo),
        Arc::new(cfg.html_renderer()),
        cfg.matcher_config(),
    ))
}

/// One-shot comparison of two files.
pub fn compare_files(
    path_a: &Path,
    path_b: &Path,
    cfg: &PlagiaryConfig,
) -> Result<ComparisonReport, PipelineError> {
    let comparator = build_comparator(cfg)?;
    let report = comparator.compare(path_a, path_b)?;
    comparator.repository().flush()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn in_memory_config(dir: &Path) -> PlagiaryConfig {
        let mut cfg = PlagiaryConfig::default();
        cfg.store.backend = "in_memory".to_string();
        cfg.extract.recognize_images = false;
        cfg.report.output_dir = dir.join("reports");
        cfg.perceptual.shingle_size = 3;
        cfg
    }

    #[test]
    fn compare_files_writes_reports() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "The quick brown fox jumps over").unwrap();
        fs::write(&b, "My quick brown fox leaps over").unwrap();

        let report = compare_files(&a, &b, &in_memory_config(dir.path())).unwrap();
        assert!((report.similarity - 1.0 / 7.0).abs() < 1e-12);
        assert!(report.output_a.exists());
        assert!(report.output_b.exists());
    }

    #[test]
    fn build_comparator_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = in_memory_config(dir.path());
        cfg.perceptual.shingle_size = 0;
        assert!(matches!(
            build_comparator(&cfg),
            Err(PipelineError::Config(ConfigLoadError::Validation(_)))
        ));
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        fs::write(&a, "some words here").unwrap();
        let err = compare_files(&a, &dir.path().join("nope.pdf"), &in_memory_config(dir.path()))
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Match(MatchError::Repository(RepositoryError::Input { .. }))
        ));
    }
}
