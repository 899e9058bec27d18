// SPDX-License-Identifier: MIT OR Apache-2.0

//! versegrep - Semantic verse search over scripture translations
//!
//! Ingests scripture text, embeds each verse with nomic-embed-text-v1.5,
//! stores per-translation usearch indexes, and answers free-text queries by
//! merging nearest-neighbor results across translations.

mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use versegrep::config::Config;
use versegrep::{embedding, registry, search, setup};

fn main() -> Result<()> {
    // Initialize tracing with VERSEGREP_LOG env var (e.g., VERSEGREP_LOG=debug versegrep -s "query")
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("VERSEGREP_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load();

    if cli.list_translations {
        for (code, name) in registry::entries() {
            println!("{code}:");
            println!("    Name: {name}");
        }
    }

    if !cli.setup && cli.search.is_none() {
        return Ok(());
    }

    // The embedding model is costly to load; construct it at most once and
    // share it between setup and search
    let mut provider = embedding::provider_from_config(&config)?;

    if cli.setup {
        setup::run(
            &setup::SetupOptions {
                data_path: cli.data_path.clone(),
                resume: cli.resume,
                translation: cli.translation.clone(),
            },
            provider.as_mut(),
        )?;
    }

    if let Some(query) = cli.search.as_deref() {
        search::run(
            &search::SearchOptions {
                data_path: cli.data_path.clone(),
                translation: cli.translation.clone(),
                n_docs: config.search().merge_n_docs(cli.n_docs),
                output: cli.output,
            },
            query,
            provider.as_mut(),
        )?;
    }

    Ok(())
}
