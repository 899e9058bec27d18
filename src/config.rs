// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for versegrep
//!
//! Loads configuration from .versegreprc.toml in current directory or ~/.config/versegrep/config.toml

use serde::Deserialize;
use std::path::PathBuf;

use crate::store::EMBEDDING_DIM;

/// Embedding provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderType {
    /// fastembed with the nomic model
    #[default]
    Builtin,
    /// Deterministic hash-derived vectors, for tests and offline runs
    Dummy,
}

/// Embedding configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider type (builtin, dummy)
    pub provider: Option<EmbeddingProviderType>,
    /// Model identifier for the builtin provider
    pub model: Option<String>,
    /// Batch size passed to the embedding model
    pub batch_size: Option<usize>,
    /// Maximum characters per document before truncation
    pub max_chars: Option<usize>,
    /// Vector dimension for the dummy provider
    pub dimension: Option<usize>,
}

impl EmbeddingConfig {
    /// Get provider type (defaults to Builtin)
    pub fn provider(&self) -> EmbeddingProviderType {
        self.provider.unwrap_or_default()
    }

    /// Get model identifier (defaults to nomic-embed-text-v1.5)
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or("nomic-embed-text-v1.5")
    }

    /// Get batch size (defaults to 256)
    pub fn batch_size(&self) -> usize {
        self.batch_size.unwrap_or(256)
    }

    /// Get max chars per document (defaults to 2000)
    pub fn max_chars(&self) -> usize {
        self.max_chars.unwrap_or(2000)
    }

    /// Get vector dimension for the dummy provider (defaults to 768)
    pub fn dimension(&self) -> usize {
        self.dimension.unwrap_or(EMBEDDING_DIM)
    }
}

/// Search configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Default number of documents to retrieve
    pub n_docs: Option<usize>,
}

impl SearchConfig {
    /// Merge CLI option with config (CLI wins, defaults to 5)
    pub fn merge_n_docs(&self, cli_value: Option<usize>) -> usize {
        cli_value.or(self.n_docs).unwrap_or(5)
    }
}

/// Configuration loaded from .versegreprc.toml or ~/.config/versegrep/config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Search configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Embedding configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

impl Config {
    /// Load configuration from files
    ///
    /// Precedence (highest to lowest):
    /// 1. .versegreprc.toml in current directory
    /// 2. ~/.config/versegrep/config.toml
    pub fn load() -> Self {
        if let Some(config) = Self::load_from_path(&PathBuf::from(".versegreprc.toml")) {
            return config;
        }

        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".config").join("versegrep").join("config.toml");
            if let Some(config) = Self::load_from_path(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    fn load_from_path(path: &PathBuf) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get the search configuration
    pub fn search(&self) -> &SearchConfig {
        &self.search
    }

    /// Get the embedding configuration
    pub fn embedding(&self) -> &EmbeddingConfig {
        &self.embedding
    }
}
