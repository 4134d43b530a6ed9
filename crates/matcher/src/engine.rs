use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use index::{DocRepresentation, Repository};
use perceptual::{build_shingles, jaccard, PerceptualConfig};
use tracing::{info, Level};

use crate::report::{HtmlReportRenderer, ReportRenderer};
use crate::segment::{matched_positions, segments};
use crate::types::{ComparisonReport, ComparisonResult, MatchError, ReportHeader};

#[cfg(test)]
mod tests;

pub const DEFAULT_OUTPUT_DIR: &str = "visualizations";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Process both documents concurrently on the rayon pool.
    pub parallel: bool,
    /// Directory receiving the rendered reports. Created if missing.
    pub output_dir: PathBuf,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl MatcherConfig {
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

/// Compares two documents through a shared [`Repository`] and renders the
/// highlighted reports.
pub struct Comparator {
    repo: Arc<Repository>,
    renderer: Arc<dyn ReportRenderer>,
    cfg: MatcherConfig,
}

impl Comparator {
    pub fn new(repo: Arc<Repository>, renderer: Arc<dyn ReportRenderer>, cfg: MatcherConfig) -> Self {
        Self { repo, renderer, cfg }
    }

    /// Comparator writing [`HtmlReportRenderer`] reports with default limits.
    pub fn with_html_reports(repo: Arc<Repository>, cfg: MatcherConfig) -> Self {
        Self::new(repo, Arc::new(HtmlReportRenderer::default()), cfg)
    }

    pub fn repository(&self) -> &Arc<Repository> {
        &self.repo
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.cfg
    }

    fn process_pair(
        &self,
        path_a: &Path,
        path_b: &Path,
    ) -> Result<(Arc<DocRepresentation>, Arc<DocRepresentation>), MatchError> {
        let (a, b) = if self.cfg.parallel {
            rayon::join(|| self.repo.process(path_a), || self.repo.process(path_b))
        } else {
            (self.repo.process(path_a), self.repo.process(path_b))
        };
        Ok((a?, b?))
    }

    /// Similarity and matched positions without rendering anything.
    pub fn compare_documents(&self, path_a: &Path, path_b: &Path) -> Result<ComparisonResult, MatchError> {
        let (a, b) = self.process_pair(path_a, path_b)?;
        Ok(compare_representations(a, b, &self.repo.config().perceptual))
    }

    /// Compare two documents and write one report per side.
    pub fn compare(&self, path_a: &Path, path_b: &Path) -> Result<ComparisonReport, MatchError> {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "matcher.compare",
            a = %path_a.display(),
            b = %path_b.display()
        );
        let _guard = span.enter();

        fs::create_dir_all(&self.cfg.output_dir).map_err(|source| MatchError::OutputDir {
            path: self.cfg.output_dir.clone(),
            source,
        })?;

        let result = self.compare_documents(path_a, path_b)?;
        info!(
            similarity = result.similarity,
            matched_a = result.matched_a.len(),
            matched_b = result.matched_b.len(),
            "similarity_computed"
        );

        let stem_a = file_stem(path_a);
        let stem_b = file_stem(path_b);
        let ext = self.renderer.extension();
        let output_a = self
            .cfg
            .output_dir
            .join(format!("{stem_a}_vs_{stem_b}_highlighted.{ext}"));
        let output_b = self
            .cfg
            .output_dir
            .join(format!("{stem_b}_vs_{stem_a}_highlighted.{ext}"));

        self.render_side(&result.a, &result.matched_a, (path_a, path_b), result.similarity, &output_a)?;
        self.render_side(&result.b, &result.matched_b, (path_b, path_a), result.similarity, &output_b)?;

        info!(
            elapsed_micros = start.elapsed().as_micros(),
            "comparison_complete"
        );

        Ok(ComparisonReport {
            similarity: result.similarity,
            matched_a: result.matched_a.len(),
            matched_b: result.matched_b.len(),
            tokens_a: result.a.token_count,
            tokens_b: result.b.token_count,
            output_a,
            output_b,
        })
    }

    /// `(document, compared_with)` are the caller's paths. The stored
    /// `source_path` may name another file when content fingerprints collide.
    fn render_side(
        &self,
        rep: &DocRepresentation,
        matched: &std::collections::BTreeSet<usize>,
        (document, compared_with): (&Path, &Path),
        similarity: f64,
        output: &Path,
    ) -> Result<(), MatchError> {
        let header = ReportHeader {
            document: file_name(document),
            compared_with: file_name(compared_with),
            similarity,
            matched_tokens: matched.len(),
            total_tokens: rep.token_count,
        };
        self.renderer
            .render(&segments(&rep.tokens, matched), &header, output)
    }
}

/// Similarity and matched positions of two already built representations.
///
/// Positions are recomputed from the stored tokens with `cfg.k`.
pub fn compare_representations(
    a: Arc<DocRepresentation>,
    b: Arc<DocRepresentation>,
    cfg: &PerceptualConfig,
) -> ComparisonResult {
    let similarity = jaccard(&a.shingles, &b.shingles);
    let (shingles_a, shingles_b) = rayon::join(
        || build_shingles(&a.tokens, cfg),
        || build_shingles(&b.tokens, cfg),
    );
    let (matched_a, matched_b) = matched_positions(&shingles_a.positions, &shingles_b.positions, cfg.k);

    ComparisonResult {
        similarity,
        a,
        b,
        matched_a,
        matched_b,
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
