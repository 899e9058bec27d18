// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end ingestion and search pipeline tests using the dummy provider.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use versegrep::embedding::{DummyProvider, EmbeddingProvider};
use versegrep::search::{self, SearchOptions};
use versegrep::setup::{self, SetupOptions};
use versegrep::store;

const DIM: usize = 32;

const GENESIS_KJV: &str = r#"{
    "Genesis": {
        "1": {
            "1": "In the beginning",
            "2": "And the earth was void"
        }
    }
}"#;

const GENESIS_WEB: &str = r#"{
    "Genesis": {
        "1": {
            "1": "In the beginning, God created the heavens and the earth.",
            "2": "The earth was formless and empty."
        }
    }
}"#;

fn write_translation(data_path: &Path, code: &str, json: &str) {
    let versions = data_path.join("versions");
    fs::create_dir_all(&versions).unwrap();
    fs::write(versions.join(format!("{code}.json")), json).unwrap();
}

fn build(data_path: &Path, translation: Option<&str>) {
    let mut provider = DummyProvider::new(DIM);
    setup::build_indexes(
        &SetupOptions {
            data_path: data_path.to_path_buf(),
            resume: false,
            translation: translation.map(str::to_string),
        },
        &mut provider,
    )
    .unwrap();
}

fn search_options(data_path: &Path, translation: Option<&str>, n_docs: usize) -> SearchOptions {
    SearchOptions {
        data_path: data_path.to_path_buf(),
        translation: translation.map(str::to_string),
        n_docs,
        output: false,
    }
}

#[test]
fn indexing_assigns_positional_keys() {
    let dir = TempDir::new().unwrap();
    write_translation(dir.path(), "KJV", GENESIS_KJV);
    build(dir.path(), None);

    let embeddings = dir.path().join("embeddings");
    let metadata =
        store::read_metadata(&store::metadata_path(&embeddings, "King James Version")).unwrap();
    assert_eq!(metadata.len(), 2);
    assert_eq!(metadata[0].verse, "1");
    assert_eq!(metadata[1].verse, "2");
    assert_eq!(metadata[0].translation, "King James Version");

    let index = store::VerseIndex::open(
        &store::index_path(&embeddings, "King James Version"),
        DIM,
    )
    .unwrap();
    assert_eq!(index.len(), 2);

    // Key k joins to the k-th metadata record: querying with the exact
    // document vector of verse 2 must return key 1
    let mut provider = DummyProvider::new(DIM);
    let document = "search_document: Genesis 1:2 And the earth was void".to_string();
    let vector = provider.embed_one(&document).unwrap();
    let hits = index.search(&vector, 1).unwrap();
    assert_eq!(hits[0].key, 1);
}

#[test]
fn genesis_two_verse_scenario() {
    let dir = TempDir::new().unwrap();
    write_translation(dir.path(), "KJV", GENESIS_KJV);
    build(dir.path(), None);

    let mut provider = DummyProvider::new(DIM);
    let hits = search::collect_hits(
        &search_options(dir.path(), None, 1),
        "creation of the world",
        &mut provider,
    )
    .unwrap();
    let top = search::merge_hits(hits, 1);

    assert_eq!(top.len(), 1);
    assert_eq!(top[0].record.book, "Genesis");
    assert_eq!(top[0].record.chapter, "1");
    assert!(top[0].record.verse == "1" || top[0].record.verse == "2");
    assert!(top[0].distance > -1e-5);
}

#[test]
fn setup_skips_already_indexed_translations() {
    let dir = TempDir::new().unwrap();
    write_translation(dir.path(), "KJV", GENESIS_KJV);
    build(dir.path(), None);

    let embeddings = dir.path().join("embeddings");
    let metadata_file = store::metadata_path(&embeddings, "King James Version");
    let index_file = store::index_path(&embeddings, "King James Version");
    let metadata_before = fs::read(&metadata_file).unwrap();
    let index_before = fs::read(&index_file).unwrap();

    // Change the source; the existing metadata file must still short-circuit
    write_translation(dir.path(), "KJV", GENESIS_WEB);
    build(dir.path(), None);

    assert_eq!(fs::read(&metadata_file).unwrap(), metadata_before);
    assert_eq!(fs::read(&index_file).unwrap(), index_before);
}

#[test]
fn setup_translation_filter_only_builds_that_translation() {
    let dir = TempDir::new().unwrap();
    write_translation(dir.path(), "KJV", GENESIS_KJV);
    write_translation(dir.path(), "WEB", GENESIS_WEB);
    build(dir.path(), Some("KJV"));

    let embeddings = dir.path().join("embeddings");
    assert!(store::metadata_path(&embeddings, "King James Version").exists());
    assert!(!store::metadata_path(&embeddings, "World English Bible").exists());
}

#[test]
fn search_returns_at_most_n_results_globally() {
    let dir = TempDir::new().unwrap();
    write_translation(dir.path(), "KJV", GENESIS_KJV);
    write_translation(dir.path(), "WEB", GENESIS_WEB);
    build(dir.path(), None);

    let mut provider = DummyProvider::new(DIM);
    let hits = search::collect_hits(
        &search_options(dir.path(), None, 2),
        "beginning of the earth",
        &mut provider,
    )
    .unwrap();
    // Each translation contributed up to 2 candidates
    assert_eq!(hits.len(), 4);

    let top = search::merge_hits(hits, 2);
    assert_eq!(top.len(), 2);
    assert!(top[0].distance <= top[1].distance);
}

#[test]
fn filtered_search_only_returns_that_translation() {
    let dir = TempDir::new().unwrap();
    write_translation(dir.path(), "KJV", GENESIS_KJV);
    write_translation(dir.path(), "WEB", GENESIS_WEB);
    build(dir.path(), None);

    let mut provider = DummyProvider::new(DIM);
    for filter in ["WEB", "World English Bible"] {
        let hits = search::collect_hits(
            &search_options(dir.path(), Some(filter), 5),
            "formless and empty",
            &mut provider,
        )
        .unwrap();
        assert!(!hits.is_empty());
        assert!(hits
            .iter()
            .all(|hit| hit.record.translation == "World English Bible"));
    }
}

#[test]
fn search_silently_skips_missing_translations() {
    // Only one of the known translations has a persisted pair
    let dir = TempDir::new().unwrap();
    write_translation(dir.path(), "KJV", GENESIS_KJV);
    build(dir.path(), None);

    let mut provider = DummyProvider::new(DIM);
    let hits = search::collect_hits(
        &search_options(dir.path(), None, 5),
        "in the beginning",
        &mut provider,
    )
    .unwrap();
    assert!(hits
        .iter()
        .all(|hit| hit.record.translation == "King James Version"));
}

#[test]
fn unknown_translation_filter_is_an_error() {
    let dir = TempDir::new().unwrap();
    write_translation(dir.path(), "KJV", GENESIS_KJV);
    build(dir.path(), None);

    let mut provider = DummyProvider::new(DIM);
    let err = search::collect_hits(
        &search_options(dir.path(), Some("XYZ"), 5),
        "anything",
        &mut provider,
    )
    .unwrap_err();
    assert!(err.to_string().contains("unknown translation"));
}

#[test]
fn unregistered_version_falls_back_to_file_literal() {
    let dir = TempDir::new().unwrap();
    write_translation(dir.path(), "CUSTOM", GENESIS_KJV);
    build(dir.path(), None);

    let embeddings = dir.path().join("embeddings");
    let metadata = store::read_metadata(&store::metadata_path(&embeddings, "CUSTOM")).unwrap();
    assert_eq!(metadata[0].translation, "CUSTOM");
}

#[test]
fn non_resume_prepare_clears_embeddings() {
    let dir = TempDir::new().unwrap();
    let stale = dir.path().join("embeddings").join("stale.json");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "[]").unwrap();

    setup::prepare_data_dirs(dir.path(), true).unwrap();
    assert!(stale.exists());

    setup::prepare_data_dirs(dir.path(), false).unwrap();
    assert!(!stale.exists());
    assert!(dir.path().join("embeddings").is_dir());
    assert!(dir.path().join("resources").is_dir());
}
