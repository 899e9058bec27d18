// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding module - wraps the text embedding model behind a provider trait
//!
//! The provider is constructed once at program start and passed down as an
//! explicit dependency, so lifecycle and test substitution are explicit.

pub mod provider;

pub use provider::{DummyProvider, EmbeddingProvider, EmbeddingProviderConfig, FastEmbedder};

use anyhow::Result;

use crate::config::{Config, EmbeddingProviderType};

/// Constructs the configured embedding provider.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn EmbeddingProvider>> {
    match config.embedding().provider() {
        EmbeddingProviderType::Builtin => Ok(Box::new(FastEmbedder::new(
            EmbeddingProviderConfig::from_config(config)?,
        )?)),
        EmbeddingProviderType::Dummy => {
            Ok(Box::new(DummyProvider::new(config.embedding().dimension())))
        }
    }
}
