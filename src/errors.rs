// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed errors for the persisted index/metadata store.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A translation filter matched neither a code nor a canonical name.
    #[error("unknown translation reference '{0}'")]
    UnknownTranslation(String),

    #[error("index file not found: {0}")]
    MissingIndex(PathBuf),

    #[error("metadata file not found: {0}")]
    MissingMetadata(PathBuf),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// An index key with no corresponding metadata entry. The positional
    /// correspondence between keys and the metadata array is the only join
    /// mechanism, so this means the pair on disk is inconsistent.
    #[error("index key {key} has no metadata entry (metadata has {len} records)")]
    KeyOutOfRange { key: u64, len: usize },

    #[error("index path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),
}
