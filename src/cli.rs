// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use clap::Parser;
use std::path::PathBuf;

/// versegrep - Semantic verse search over scripture translations
///
/// Builds per-translation vector indexes from scraped scripture text and
/// answers free-text queries with the closest verses across one or all
/// translations.
#[derive(Parser, Debug)]
#[command(name = "versegrep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TAKES A LONG TIME! Download the corpus, scrape all translations and
    /// build the vector indexes. Run when you do not need your computer
    #[arg(long)]
    pub setup: bool,

    /// Use with --setup to skip redownloading scraped data and translations
    /// that are already fully indexed
    #[arg(long, requires = "setup")]
    pub resume: bool,

    /// Root directory for corpus data (resources/, versions/, embeddings/)
    #[arg(long, default_value = "data/")]
    pub data_path: PathBuf,

    /// Search the indexed translations for verses related to the given text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Restrict indexing or search to one translation (code or full name),
    /// otherwise all translations
    #[arg(short, long)]
    pub translation: Option<String>,

    /// List the known translations and their codes
    #[arg(short, long)]
    pub list_translations: bool,

    /// Number of documents to retrieve [default: 5]
    #[arg(short, long)]
    pub n_docs: Option<usize>,

    /// Write search results to output.json in the current directory
    #[arg(short, long)]
    pub output: bool,
}
