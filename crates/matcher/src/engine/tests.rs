use super::*;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use index::{FingerprintMode, RepositoryConfig};
use ingest::{ExtractConfig, ExtractError, ExtractedDocument, Extractor, NoopRecognizer};

use crate::types::Segment;

/// Reads files as plain text and counts extraction calls.
#[derive(Default)]
struct TextExtractor {
    calls: AtomicUsize,
}

impl Extractor for TextExtractor {
    fn extract(&self, path: &Path, _: &ExtractConfig) -> Result<ExtractedDocument, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let text = fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
        Ok(ExtractedDocument::from_text(text))
    }
}

/// Captures what it was asked to render instead of writing files.
#[derive(Default)]
struct RecordingRenderer {
    calls: Mutex<Vec<(PathBuf, ReportHeader, Vec<Segment>)>>,
}

impl ReportRenderer for RecordingRenderer {
    fn extension(&self) -> &str {
        "txt"
    }

    fn render(&self, segments: &[Segment], header: &ReportHeader, path: &Path) -> Result<(), MatchError> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), header.clone(), segments.to_vec()));
        Ok(())
    }
}

struct Fixture {
    dir: tempfile::TempDir,
    extractor: Arc<TextExtractor>,
    comparator: Comparator,
}

fn fixture(k: usize, parallel: bool) -> Fixture {
    fixture_with(k, parallel, Arc::new(HtmlReportRenderer::default()))
}

fn fixture_with(k: usize, parallel: bool, renderer: Arc<dyn ReportRenderer>) -> Fixture {
    fixture_in(RepositoryConfig::new().with_shingle_size(k), parallel, renderer)
}

fn fixture_in(repo_cfg: RepositoryConfig, parallel: bool, renderer: Arc<dyn ReportRenderer>) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let extractor = Arc::new(TextExtractor::default());
    let repo = Repository::in_memory(
        repo_cfg,
        extractor.clone(),
        Arc::new(NoopRecognizer),
    )
    .unwrap();
    let cfg = MatcherConfig::default()
        .with_parallel(parallel)
        .with_output_dir(dir.path().join("visualizations"));
    let comparator = Comparator::new(Arc::new(repo), renderer, cfg);
    Fixture {
        dir,
        extractor,
        comparator,
    }
}

fn write(dir: &tempfile::TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn quick_brown_fox_end_to_end() {
    let fx = fixture(3, true);
    let a = write(&fx.dir, "a.txt", "The quick brown fox jumps over");
    let b = write(&fx.dir, "b.txt", "My quick brown fox leaps over");

    let result = fx.comparator.compare_documents(&a, &b).unwrap();
    assert!((result.similarity - 1.0 / 7.0).abs() < 1e-12);
    assert_eq!(result.matched_a, BTreeSet::from([1, 2, 3]));
    assert_eq!(result.matched_b, BTreeSet::from([1, 2, 3]));
}

#[test]
fn compare_writes_both_reports() {
    let fx = fixture(3, false);
    let a = write(&fx.dir, "essay.txt", "The quick brown fox jumps over");
    let b = write(&fx.dir, "source.txt", "My quick brown fox leaps over");

    let report = fx.comparator.compare(&a, &b).unwrap();
    let out_dir = fx.dir.path().join("visualizations");
    assert_eq!(report.output_a, out_dir.join("essay_vs_source_highlighted.html"));
    assert_eq!(report.output_b, out_dir.join("source_vs_essay_highlighted.html"));
    assert_eq!((report.matched_a, report.matched_b), (3, 3));
    assert_eq!((report.tokens_a, report.tokens_b), (6, 6));

    let html_a = fs::read_to_string(&report.output_a).unwrap();
    assert!(html_a.contains("<dd>essay.txt</dd>"));
    assert!(html_a.contains("<dd>source.txt</dd>"));
    assert!(html_a.contains("<dd>14.29%</dd>"));
    assert!(html_a.contains("<p>the <mark>quick brown fox</mark> jumps over</p>"));

    let html_b = fs::read_to_string(&report.output_b).unwrap();
    assert!(html_b.contains("<p>my <mark>quick brown fox</mark> leaps over</p>"));
}

#[test]
fn identical_documents_fully_match() {
    let fx = fixture(5, true);
    let text = "It was the best of times it was the worst of times it was the age of wisdom";
    let a = write(&fx.dir, "a.txt", text);
    let b = write(&fx.dir, "b.txt", text);

    let result = fx.comparator.compare_documents(&a, &b).unwrap();
    assert_eq!(result.similarity, 1.0);
    assert_eq!(result.matched_a.len(), result.a.token_count);
    assert_eq!(result.matched_b.len(), result.b.token_count);
}

#[test]
fn disjoint_documents_render_one_plain_run() {
    let renderer = Arc::new(RecordingRenderer::default());
    let fx = fixture_with(2, false, renderer.clone());
    let a = write(&fx.dir, "a.txt", "alpha beta gamma delta");
    let b = write(&fx.dir, "b.txt", "one two three four");

    let report = fx.comparator.compare(&a, &b).unwrap();
    assert_eq!(report.similarity, 0.0);
    assert!(report.output_a.ends_with("a_vs_b_highlighted.txt"));

    let calls = renderer.calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    for (_, header, segments) in calls.iter() {
        assert_eq!(header.matched_tokens, 0);
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].highlighted);
    }
}

#[test]
fn short_documents_are_identical_by_convention() {
    let fx = fixture(5, true);
    let a = write(&fx.dir, "a.txt", "only four tokens here");
    let b = write(&fx.dir, "b.txt", "three tokens here");

    let result = fx.comparator.compare_documents(&a, &b).unwrap();
    assert_eq!(result.similarity, 1.0);
    assert!(result.matched_a.is_empty());
    assert!(result.matched_b.is_empty());
}

#[test]
fn repeated_compare_uses_cache() {
    let fx = fixture(3, true);
    let a = write(&fx.dir, "a.txt", "The quick brown fox jumps over");
    let b = write(&fx.dir, "b.txt", "My quick brown fox leaps over");

    fx.comparator.compare(&a, &b).unwrap();
    fx.comparator.compare(&b, &a).unwrap();
    assert_eq!(fx.extractor.calls.load(Ordering::SeqCst), 2);
    assert_eq!(fx.comparator.repository().len(), 2);
}

#[test]
fn headers_describe_each_side() {
    let renderer = Arc::new(RecordingRenderer::default());
    let fx = fixture_with(3, true, renderer.clone());
    let a = write(&fx.dir, "first.txt", "The quick brown fox jumps over the lazy dog");
    let b = write(&fx.dir, "second.txt", "My quick brown fox leaps");

    fx.comparator.compare(&a, &b).unwrap();
    let calls = renderer.calls.lock().unwrap();
    let (path_a, header_a, _) = &calls[0];
    let (path_b, header_b, _) = &calls[1];

    assert!(path_a.ends_with("first_vs_second_highlighted.txt"));
    assert!(path_b.ends_with("second_vs_first_highlighted.txt"));
    assert_eq!(header_a.document, "first.txt");
    assert_eq!(header_a.compared_with, "second.txt");
    assert_eq!((header_a.matched_tokens, header_a.total_tokens), (3, 9));
    assert_eq!(header_b.document, "second.txt");
    assert_eq!((header_b.matched_tokens, header_b.total_tokens), (3, 5));
}

#[test]
fn identical_content_keeps_caller_names_in_headers() {
    let renderer = Arc::new(RecordingRenderer::default());
    let repo_cfg = RepositoryConfig::new()
        .with_shingle_size(3)
        .with_fingerprint(FingerprintMode::Content);
    let fx = fixture_in(repo_cfg, false, renderer.clone());
    let text = "The quick brown fox jumps over the lazy dog";
    let a = write(&fx.dir, "alpha.txt", text);
    let b = write(&fx.dir, "beta.txt", text);

    let report = fx.comparator.compare(&a, &b).unwrap();
    assert_eq!(report.similarity, 1.0);
    // Both files map to one stored representation.
    assert_eq!(fx.comparator.repository().len(), 1);

    let calls = renderer.calls.lock().unwrap();
    let (path_a, header_a, _) = &calls[0];
    let (path_b, header_b, _) = &calls[1];
    assert!(path_a.ends_with("alpha_vs_beta_highlighted.txt"));
    assert!(path_b.ends_with("beta_vs_alpha_highlighted.txt"));
    assert_eq!((header_a.document.as_str(), header_a.compared_with.as_str()), ("alpha.txt", "beta.txt"));
    assert_eq!((header_b.document.as_str(), header_b.compared_with.as_str()), ("beta.txt", "alpha.txt"));
}

#[test]
fn missing_input_propagates() {
    let fx = fixture(3, true);
    let a = write(&fx.dir, "a.txt", "The quick brown fox jumps over");
    let err = fx
        .comparator
        .compare(&a, &fx.dir.path().join("missing.pdf"))
        .unwrap_err();
    assert!(matches!(
        err,
        MatchError::Repository(index::RepositoryError::Input { .. })
    ));
}

#[test]
fn output_dir_is_created() {
    let fx = fixture(3, true);
    let a = write(&fx.dir, "a.txt", "The quick brown fox jumps over");
    let b = write(&fx.dir, "b.txt", "My quick brown fox leaps over");
    let out = fx.dir.path().join("visualizations");
    assert!(!out.exists());
    fx.comparator.compare(&a, &b).unwrap();
    assert!(out.is_dir());
}
