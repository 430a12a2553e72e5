// Catalog discovery over synthetic features directories.

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use crib::catalog::FeatureCatalog;
use crib::error::CribError;
use crib::features::FeatureClass;

/// Create a feature directory holding `count` empty files with `ext`.
fn feature_dir(root: &Path, name: &str, ext: &str, count: usize) {
    let dir = root.join(name);
    fs::create_dir(&dir).unwrap();
    for i in 0..count {
        fs::write(dir.join(format!("doc{i:03}.{ext}")), "").unwrap();
    }
}

#[test]
fn discover_pairs_ngram_and_dep_directories() {
    let root = tempdir().unwrap();
    feature_dir(root.path(), "source-3-ngram", "NGram", 4);
    feature_dir(root.path(), "suspicious-3-ngram", "NGram", 4);
    feature_dir(root.path(), "source-dep", "dep", 4);
    feature_dir(root.path(), "suspicious-dep", "dep", 4);

    let catalog = FeatureCatalog::discover(root.path()).unwrap();
    assert_eq!(catalog.names(), vec!["3", "dep"]);
    assert_eq!(catalog.entries()[0].class, FeatureClass::NGram);
    assert_eq!(catalog.entries()[1].class, FeatureClass::Dependency);
}

#[test]
fn discover_orders_ngram_kinds_by_name_with_dep_last() {
    let root = tempdir().unwrap();
    feature_dir(root.path(), "source-3-ngram", "NGram", 1);
    feature_dir(root.path(), "suspicious-3-ngram", "NGram", 1);
    feature_dir(root.path(), "source-2-ngram", "NGram", 1);
    feature_dir(root.path(), "suspicious-2-ngram", "NGram", 1);
    feature_dir(root.path(), "source-dep", "dep", 1);
    feature_dir(root.path(), "suspicious-dep", "dep", 1);

    let catalog = FeatureCatalog::discover(root.path()).unwrap();
    assert_eq!(catalog.names(), vec!["2", "3", "dep"]);
}

#[test]
fn discover_without_dep_pair_is_fine() {
    let root = tempdir().unwrap();
    feature_dir(root.path(), "source-4-ngram", "NGram", 2);
    feature_dir(root.path(), "suspicious-4-ngram", "NGram", 2);

    let catalog = FeatureCatalog::discover(root.path()).unwrap();
    assert_eq!(catalog.names(), vec!["4"]);
}

#[test]
fn discover_rejects_unpaired_ngram_kind() {
    let root = tempdir().unwrap();
    feature_dir(root.path(), "source-3-ngram", "NGram", 2);

    let err = FeatureCatalog::discover(root.path()).unwrap_err();
    assert!(matches!(err, CribError::CatalogMismatch(_)), "got {err:?}");
}

#[test]
fn discover_rejects_unpaired_dep_side() {
    let root = tempdir().unwrap();
    feature_dir(root.path(), "suspicious-dep", "dep", 2);

    let err = FeatureCatalog::discover(root.path()).unwrap_err();
    assert!(matches!(err, CribError::CatalogMismatch(_)));
}

#[test]
fn discover_rejects_unequal_file_counts() {
    let root = tempdir().unwrap();
    feature_dir(root.path(), "source-3-ngram", "NGram", 10);
    feature_dir(root.path(), "suspicious-3-ngram", "NGram", 9);

    let err = FeatureCatalog::discover(root.path()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("10") && msg.contains("9"), "got: {msg}");
}

#[test]
fn discover_rejects_non_directory_root() {
    let root = tempdir().unwrap();
    let file = root.path().join("not-a-dir");
    fs::write(&file, "").unwrap();

    assert!(matches!(
        FeatureCatalog::discover(&file),
        Err(CribError::CatalogMismatch(_))
    ));
}

#[test]
fn discover_ignores_unrelated_directories() {
    let root = tempdir().unwrap();
    feature_dir(root.path(), "source-3-ngram", "NGram", 1);
    feature_dir(root.path(), "suspicious-3-ngram", "NGram", 1);
    fs::create_dir(root.path().join("scratch")).unwrap();

    let catalog = FeatureCatalog::discover(root.path()).unwrap();
    assert_eq!(catalog.names(), vec!["3"]);
}
