// SPDX-License-Identifier: MIT OR Apache-2.0

//! Federated search across per-translation indexes.
//!
//! Embeds the query once, runs a k-NN search against each eligible
//! translation's index, joins hits to metadata by positional key, and merges
//! everything into a single globally ranked top-N.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::embedding::EmbeddingProvider;
use crate::errors::StoreError;
use crate::format::{VerseRecord, QUERY_MARKER};
use crate::output;
use crate::registry;
use crate::store::{self, VerseIndex};

/// A verse hit from one translation's index: the metadata record plus its
/// index key and the distance to the query vector.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub record: VerseRecord,
    pub key: u64,
    pub distance: f32,
}

pub struct SearchOptions {
    pub data_path: PathBuf,
    pub translation: Option<String>,
    pub n_docs: usize,
    pub output: bool,
}

/// Runs a query and prints the global top-N results.
pub fn run(opts: &SearchOptions, query: &str, provider: &mut dyn EmbeddingProvider) -> Result<()> {
    let hits = collect_hits(opts, query, provider)?;

    if opts.output {
        // The file receives every per-translation candidate, unsorted and
        // untruncated, while stdout shows only the global top-N. Consumers
        // of output.json depend on getting more than N records.
        let json = serde_json::to_string_pretty(&hits)?;
        fs::write("output.json", json).context("failed to write output.json")?;
    }

    let use_color = output::use_colors();
    for hit in merge_hits(hits, opts.n_docs) {
        println!("{}", output::format_hit_line(&hit, use_color));
    }
    Ok(())
}

/// Embeds the query and gathers up to N candidates from each eligible
/// translation, in registry order.
pub fn collect_hits(
    opts: &SearchOptions,
    query: &str,
    provider: &mut dyn EmbeddingProvider,
) -> Result<Vec<SearchHit>> {
    let embeddings_dir = opts.data_path.join("embeddings");
    let encoded = provider.embed_one(&format!("{QUERY_MARKER}{query}"))?;

    let mut hits = Vec::new();
    if let Some(filter) = opts.translation.as_deref() {
        let translation = registry::resolve(filter)
            .ok_or_else(|| StoreError::UnknownTranslation(filter.to_string()))?;
        hits.extend(search_translation(
            &embeddings_dir,
            translation,
            &encoded,
            opts.n_docs,
            provider.dimension(),
        )?);
    } else {
        for translation in registry::canonical_names() {
            let index_file = store::index_path(&embeddings_dir, translation);
            let metadata_file = store::metadata_path(&embeddings_dir, translation);
            if !index_file.exists() || !metadata_file.exists() {
                debug!("no persisted index for {translation}, skipping");
                continue;
            }
            info!("searching index of translation {translation}");
            hits.extend(search_translation(
                &embeddings_dir,
                translation,
                &encoded,
                opts.n_docs,
                provider.dimension(),
            )?);
        }
    }

    Ok(hits)
}

/// Runs a k-NN search against one translation's persisted pair and joins each
/// hit to its metadata record by positional key.
pub fn search_translation(
    embeddings_dir: &Path,
    translation: &str,
    query: &[f32],
    n_docs: usize,
    dimension: usize,
) -> Result<Vec<SearchHit>> {
    let metadata = store::read_metadata(&store::metadata_path(embeddings_dir, translation))?;
    let index = VerseIndex::open(&store::index_path(embeddings_dir, translation), dimension)?;

    let mut hits = Vec::new();
    for hit in index.search(query, n_docs)? {
        let record = metadata
            .get(hit.key as usize)
            .cloned()
            .ok_or(StoreError::KeyOutOfRange {
                key: hit.key,
                len: metadata.len(),
            })?;
        hits.push(SearchHit {
            record,
            key: hit.key,
            distance: hit.distance,
        });
    }
    Ok(hits)
}

/// Sorts candidates by ascending distance and keeps the global top N.
pub fn merge_hits(mut hits: Vec<SearchHit>, n_docs: usize) -> Vec<SearchHit> {
    hits.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hits.truncate(n_docs);
    hits
}
