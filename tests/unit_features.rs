// Serialization tests for the feature representations.
//
// The pure similarity math is covered next to the implementations; these
// tests exercise the on-disk `.NGram` / `.dep` format: round-trips,
// malformed files, and missing files.

use std::fs;

use tempfile::tempdir;

use crib::error::CribError;
use crib::features::{DepRelation, DependencyFeature, NGramFeature};

// ============================================================
// Round-trips
// ============================================================

#[test]
fn ngram_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.NGram");

    let original =
        NGramFeature::from_tokens(&["the", "quick", "brown", "fox", "jumps"], 3).unwrap();
    original.save(&path).unwrap();
    let loaded = NGramFeature::load(&path).unwrap();

    assert_eq!(loaded, original, "order and shingle set must survive");
}

#[test]
fn ngram_round_trip_empty_shingle_set() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("short.NGram");

    let original = NGramFeature::from_tokens(&["word"], 2).unwrap();
    original.save(&path).unwrap();
    let loaded = NGramFeature::load(&path).unwrap();

    assert_eq!(loaded.order(), 2);
    assert!(loaded.is_empty());
}

#[test]
fn dependency_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.dep");

    let original = DependencyFeature::new(vec![
        DepRelation::new("dog", "barks", "nsubj"),
        DepRelation::new("barks", "root", "root"),
        DepRelation::new("dog", "barks", "nsubj"),
    ]);
    original.save(&path).unwrap();
    let loaded = DependencyFeature::load(&path).unwrap();

    assert_eq!(loaded, original, "duplicates and order must survive");
}

#[test]
fn save_overwrites_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.NGram");

    NGramFeature::from_tokens(&["a", "b", "c"], 2)
        .unwrap()
        .save(&path)
        .unwrap();
    let replacement = NGramFeature::from_tokens(&["x", "y"], 1).unwrap();
    replacement.save(&path).unwrap();

    assert_eq!(NGramFeature::load(&path).unwrap(), replacement);
}

// ============================================================
// File format tolerance and failures
// ============================================================

#[test]
fn ngram_load_tolerates_bom_and_trailing_newline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bom.NGram");
    fs::write(&path, "\u{feff}2\na~b\nb~c\n").unwrap();

    let loaded = NGramFeature::load(&path).unwrap();
    assert_eq!(loaded.order(), 2);
    assert_eq!(loaded.len(), 2);
}

#[test]
fn ngram_load_rejects_bad_order_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.NGram");
    fs::write(&path, "three\na~b~c\n").unwrap();

    let err = NGramFeature::load(&path).unwrap_err();
    assert!(matches!(err, CribError::MalformedFeatureFile { line: 1, .. }));
}

#[test]
fn ngram_load_rejects_wrong_field_count() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("arity.NGram");
    fs::write(&path, "3\na~b~c\na~b\n").unwrap();

    let err = NGramFeature::load(&path).unwrap_err();
    assert!(matches!(err, CribError::MalformedFeatureFile { line: 3, .. }));
}

#[test]
fn dependency_load_rejects_wrong_field_count() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("arity.dep");
    fs::write(&path, "dog~barks~nsubj\ndog~barks\n").unwrap();

    let err = DependencyFeature::load(&path).unwrap_err();
    assert!(matches!(err, CribError::MalformedFeatureFile { line: 2, .. }));
}

#[test]
fn load_missing_file_is_file_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.NGram");

    assert!(matches!(
        NGramFeature::load(&path),
        Err(CribError::FileNotFound(_))
    ));
    assert!(matches!(
        DependencyFeature::load(&dir.path().join("absent.dep")),
        Err(CribError::FileNotFound(_))
    ));
}
