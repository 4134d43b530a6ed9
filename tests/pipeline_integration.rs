use std::fs;
use std::path::{Path, PathBuf};

use plagiary::{build_comparator, compare_files, open_repository, PlagiaryConfig};

fn config(dir: &Path, k: usize) -> PlagiaryConfig {
    let mut cfg = PlagiaryConfig::default();
    cfg.perceptual.shingle_size = k;
    cfg.extract.recognize_images = false;
    cfg.store.path = dir.join("cache").join("doc_reps.redb");
    cfg.report.output_dir = dir.join("visualizations");
    cfg
}

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn end_to_end_compare_with_persisted_store() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "essay.txt", "The quick brown fox jumps over");
    let b = write(dir.path(), "source.txt", "My quick brown fox leaps over");
    let cfg = config(dir.path(), 3);

    let report = compare_files(&a, &b, &cfg).unwrap();
    assert!((report.similarity - 1.0 / 7.0).abs() < 1e-12);
    assert_eq!((report.matched_a, report.matched_b), (3, 3));
    assert_eq!(
        report.output_a,
        dir.path()
            .join("visualizations")
            .join("essay_vs_source_highlighted.html")
    );

    let html = fs::read_to_string(&report.output_b).unwrap();
    assert!(html.contains("Plagiarism Analysis Report"));
    assert!(html.contains("<mark>quick brown fox</mark>"));
    assert!(cfg.store.path.exists());

    let reopened = open_repository(&cfg).unwrap();
    assert_eq!(reopened.len(), 2);
}

#[test]
fn second_run_reuses_stored_representations() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.txt", "alpha beta gamma delta epsilon zeta");
    let b = write(dir.path(), "b.txt", "alpha beta gamma delta eta theta");
    let cfg = config(dir.path(), 2);

    let first = compare_files(&a, &b, &cfg).unwrap();

    let comparator = build_comparator(&cfg).unwrap();
    let repo = comparator.repository().clone();
    let id_a = repo.compute_fingerprint(&a).unwrap();
    let cached = repo.get(&id_a).expect("loaded from store");
    assert_eq!(cached.token_count, 6);
    assert_eq!(cached.shingle_size, 2);

    let second = comparator.compare(&a, &b).unwrap();
    assert_eq!(first.similarity, second.similarity);
    assert_eq!(repo.len(), 2);
}

#[test]
fn changing_shingle_size_rebuilds_representations() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.txt", "one two three four five six seven");
    let b = write(dir.path(), "b.txt", "one two three four nine ten eleven");

    let k2 = compare_files(&a, &b, &config(dir.path(), 2)).unwrap();
    let k4 = compare_files(&a, &b, &config(dir.path(), 4)).unwrap();

    // k=2 shares {one two, two three, three four} out of 9 distinct bigrams.
    assert!((k2.similarity - 3.0 / 9.0).abs() < 1e-12);
    // k=4 shares only "one two three four" out of 7 distinct windows.
    assert!((k4.similarity - 1.0 / 7.0).abs() < 1e-12);

    let repo = open_repository(&config(dir.path(), 4)).unwrap();
    let rep = repo.get(&repo.compute_fingerprint(&a).unwrap()).unwrap();
    assert_eq!(rep.shingle_size, 4);
}

#[test]
fn candidates_come_from_the_shared_index() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.txt", "red green blue yellow");
    let b = write(dir.path(), "b.txt", "red green blue purple");
    let c = write(dir.path(), "c.txt", "nothing in common at all");
    let cfg = config(dir.path(), 2);

    let comparator = build_comparator(&cfg).unwrap();
    comparator.compare(&a, &b).unwrap();
    comparator.compare(&a, &c).unwrap();

    let repo = comparator.repository();
    let id_a = repo.compute_fingerprint(&a).unwrap();
    let id_b = repo.compute_fingerprint(&b).unwrap();
    assert_eq!(repo.candidates(&id_a), vec![(id_b, 2)]);
}
