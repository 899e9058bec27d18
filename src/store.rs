// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-translation persisted store: a usearch vector index plus a parallel
//! metadata array, written as `<translation>_index.usearch` and
//! `<translation>_metadata.json` under the embeddings directory.
//!
//! Invariant: key `k` in the index corresponds exactly to the `k`-th entry of
//! the metadata array. Keys are assigned `0..N-1` in the order verses were
//! embedded and this positional correspondence is the sole join mechanism
//! between the two files.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use usearch::{Index, IndexOptions, MetricKind, ScalarKind};

use crate::errors::StoreError;
use crate::format::VerseRecord;

/// Embedding dimension of nomic-embed-text-v1.5.
pub const EMBEDDING_DIM: usize = 768;

/// Path of a translation's metadata file.
pub fn metadata_path(embeddings_dir: &Path, translation: &str) -> PathBuf {
    embeddings_dir.join(format!("{translation}_metadata.json"))
}

/// Path of a translation's index file.
pub fn index_path(embeddings_dir: &Path, translation: &str) -> PathBuf {
    embeddings_dir.join(format!("{translation}_index.usearch"))
}

/// Writes the full metadata array, replacing any previous contents.
///
/// Called after every book during indexing so the on-disk file always
/// reflects all verses processed so far for the translation.
pub fn write_metadata(path: &Path, records: &[VerseRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Reads a translation's full metadata array.
pub fn read_metadata(path: &Path) -> Result<Vec<VerseRecord>> {
    if !path.exists() {
        return Err(StoreError::MissingMetadata(path.to_path_buf()).into());
    }
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("malformed metadata in {}", path.display()))
}

/// One nearest-neighbor match. Lower distance means more similar.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub key: u64,
    pub distance: f32,
}

/// Cosine-metric vector index over one translation's verse embeddings.
pub struct VerseIndex {
    index: Index,
    dimension: usize,
}

impl std::fmt::Debug for VerseIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerseIndex")
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl VerseIndex {
    fn options(dimension: usize) -> IndexOptions {
        IndexOptions {
            dimensions: dimension,
            metric: MetricKind::Cos,
            quantization: ScalarKind::F32,
            ..Default::default()
        }
    }

    /// Creates an empty index for vectors of the given dimension.
    pub fn new(dimension: usize) -> Result<Self> {
        let index = Index::new(&Self::options(dimension))
            .map_err(|e| anyhow!("failed to create usearch index: {e}"))?;
        Ok(Self { index, dimension })
    }

    /// Restores a persisted index from disk.
    pub fn open(path: &Path, dimension: usize) -> Result<Self> {
        if !path.exists() {
            return Err(StoreError::MissingIndex(path.to_path_buf()).into());
        }
        let restored = Self::new(dimension)?;
        restored
            .index
            .load(path_str(path)?)
            .map_err(|e| anyhow!("failed to restore index {}: {e}", path.display()))?;
        Ok(restored)
    }

    /// Adds all vectors in one batch, assigning keys `0..N-1` in slice order.
    pub fn add_batch(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        self.index
            .reserve(vectors.len())
            .map_err(|e| anyhow!("failed to reserve index capacity: {e}"))?;

        for (key, vector) in vectors.iter().enumerate() {
            if vector.len() != self.dimension {
                return Err(StoreError::DimensionMismatch {
                    expected: self.dimension,
                    actual: vector.len(),
                }
                .into());
            }
            self.index
                .add(key as u64, vector)
                .map_err(|e| anyhow!("usearch add failed for key {key}: {e}"))?;
        }
        Ok(())
    }

    /// Persists the index to disk. Called once, after all books are embedded.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.index
            .save(path_str(path)?)
            .map_err(|e| anyhow!("failed to save index {}: {e}", path.display()))
    }

    /// Returns the `count` nearest neighbors of `query`, closest first.
    pub fn search(&self, query: &[f32], count: usize) -> Result<Vec<Hit>> {
        if query.len() != self.dimension {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            }
            .into());
        }
        let matches = self
            .index
            .search(query, count)
            .map_err(|e| anyhow!("usearch search failed: {e}"))?;

        Ok(matches
            .keys
            .iter()
            .zip(matches.distances.iter())
            .map(|(&key, &distance)| Hit { key, distance })
            .collect())
    }

    pub fn len(&self) -> usize {
        self.index.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| StoreError::NonUtf8Path(path.to_path_buf()).into())
}
