use std::fs;
use std::path::Path;

use plagiary::{compare_files, PlagiaryConfig};

const ESSAY: &str = "It was the best of times, it was the worst of times, it was the age of \
    wisdom, it was the age of foolishness, it was the epoch of belief.";
const SOURCE: &str = "Some said it was the best of times; others insisted it was the age of \
    foolishness and the epoch of incredulity.";

fn config(dir: &Path, parallel: bool) -> PlagiaryConfig {
    let mut cfg = PlagiaryConfig::default();
    cfg.store.backend = "in_memory".to_string();
    cfg.extract.recognize_images = false;
    cfg.perceptual.shingle_size = 3;
    cfg.perceptual.use_parallel = parallel;
    cfg.matcher.parallel = parallel;
    cfg.report.output_dir = dir.join("reports");
    cfg
}

fn run(parallel: bool) -> (f64, String, String) {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("essay.txt");
    let b = dir.path().join("source.txt");
    fs::write(&a, ESSAY).unwrap();
    fs::write(&b, SOURCE).unwrap();

    let report = compare_files(&a, &b, &config(dir.path(), parallel)).unwrap();
    (
        report.similarity,
        fs::read_to_string(report.output_a).unwrap(),
        fs::read_to_string(report.output_b).unwrap(),
    )
}

#[test]
fn repeated_runs_produce_identical_reports() {
    let first = run(true);
    let second = run(true);
    assert_eq!(first, second);
}

#[test]
fn parallel_and_sequential_agree() {
    assert_eq!(run(true), run(false));
}

#[test]
fn punctuation_and_case_do_not_matter() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, "Hello, World! The Quick Brown Fox.").unwrap();
    fs::write(&b, "hello world the quick brown fox").unwrap();

    let report = compare_files(&a, &b, &config(dir.path(), true)).unwrap();
    assert_eq!(report.similarity, 1.0);
    assert_eq!(report.matched_a, report.tokens_a);
}

#[test]
fn similarity_is_symmetric() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, ESSAY).unwrap();
    fs::write(&b, SOURCE).unwrap();
    let cfg = config(dir.path(), true);

    let ab = compare_files(&a, &b, &cfg).unwrap();
    let ba = compare_files(&b, &a, &cfg).unwrap();
    assert_eq!(ab.similarity, ba.similarity);
    assert_eq!((ab.matched_a, ab.matched_b), (ba.matched_b, ba.matched_a));
}
