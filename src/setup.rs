// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-translation index builder.
//!
//! For each translation JSON under `versions/`, formats all books in source
//! order, embeds one book per batched call, and persists the index/metadata
//! pair. The metadata file is fully rewritten after every book; the index is
//! saved once after all books. The only resume mechanism is skipping a
//! translation whose metadata file already exists, so a partially written
//! translation from an interrupted run is skipped wholesale on `--resume`
//! and only cleared by the next non-resume setup.

use anyhow::{anyhow, Context, Result};
use indicatif::ProgressBar;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::embedding::EmbeddingProvider;
use crate::fetch;
use crate::format::{self, VerseRecord};
use crate::registry;
use crate::store::{self, VerseIndex};

pub struct SetupOptions {
    pub data_path: PathBuf,
    pub resume: bool,
    pub translation: Option<String>,
}

/// Runs the full setup pipeline: download, scrape, split, embed, index.
pub fn run(opts: &SetupOptions, provider: &mut dyn EmbeddingProvider) -> Result<()> {
    prepare_data_dirs(&opts.data_path, opts.resume)?;
    fetch::download_cross_references(&opts.data_path.join("resources"))?;
    fetch::scrape_translations(&opts.data_path, opts.resume)?;
    build_indexes(opts, provider)?;

    println!(
        "\nAll set to start querying scripture! Run again without --setup to search (versegrep --help)"
    );
    Ok(())
}

/// Creates the data directory tree. A non-resume setup clears any existing
/// embeddings and resources first.
pub fn prepare_data_dirs(data_path: &Path, resume: bool) -> Result<()> {
    let embeddings = data_path.join("embeddings");
    let resources = data_path.join("resources");

    if !resume {
        for dir in [&embeddings, &resources] {
            if dir.exists() {
                fs::remove_dir_all(dir)
                    .with_context(|| format!("failed to clear {}", dir.display()))?;
            }
        }
        info!("cleared existing embeddings");
    }

    for dir in [&embeddings, &resources] {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    Ok(())
}

/// Builds one index + metadata pair per translation JSON under `versions/`.
///
/// Split out from [`run`] so an already-scraped corpus can be indexed without
/// touching the network or the scraper tools.
pub fn build_indexes(opts: &SetupOptions, provider: &mut dyn EmbeddingProvider) -> Result<()> {
    let versions_dir = opts.data_path.join("versions");
    let embeddings_dir = opts.data_path.join("embeddings");
    fs::create_dir_all(&embeddings_dir)
        .with_context(|| format!("failed to create {}", embeddings_dir.display()))?;

    let requested = opts
        .translation
        .as_deref()
        .map(|t| registry::resolve(t).unwrap_or(t));

    let mut entries: Vec<PathBuf> = fs::read_dir(&versions_dir)
        .with_context(|| format!("failed to read {}", versions_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    entries.sort();

    for path in entries {
        let Some(literal) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        // Unknown codes fall back to the raw file-derived literal
        let translation = registry::resolve(literal).unwrap_or(literal);

        if requested.is_some_and(|r| r != translation) {
            continue;
        }

        let metadata_file = store::metadata_path(&embeddings_dir, translation);
        if metadata_file.exists() {
            info!("skipping already indexed translation {translation}");
            continue;
        }

        let index_file = store::index_path(&embeddings_dir, translation);
        index_translation(&path, translation, &metadata_file, &index_file, provider)?;
    }

    Ok(())
}

/// Embeds and indexes a single translation, book by book.
fn index_translation(
    source: &Path,
    translation: &str,
    metadata_file: &Path,
    index_file: &Path,
    provider: &mut dyn EmbeddingProvider,
) -> Result<()> {
    info!("working on translation {translation}");

    let raw = fs::read_to_string(source)
        .with_context(|| format!("failed to read {}", source.display()))?;
    let parsed: Value = serde_json::from_str(&raw)
        .with_context(|| format!("malformed translation JSON in {}", source.display()))?;
    let books = parsed
        .as_object()
        .ok_or_else(|| anyhow!("{} is not an object of books", source.display()))?;

    let mut metadata: Vec<VerseRecord> = Vec::new();
    let mut vectors: Vec<Vec<f32>> = Vec::new();

    let bar = ProgressBar::new(books.len() as u64);
    for (book, content) in books {
        bar.set_message(book.clone());
        let (documents, records) = format::format_book(book, content, translation)?;
        metadata.extend(records);

        // Rewrite the full metadata file after every book so progress is
        // observable even when a run is interrupted
        store::write_metadata(metadata_file, &metadata)?;

        debug!("[{translation}] generating embeddings for book {book}");
        // One embedding call per book, batching all of its documents
        vectors.extend(provider.embed_texts(&documents)?);
        bar.inc(1);
    }
    bar.finish_and_clear();

    let mut index = VerseIndex::new(provider.dimension())?;
    index.add_batch(&vectors)?;
    index.save(index_file)?;

    info!("indexed {} verses for {translation}", metadata.len());
    Ok(())
}
