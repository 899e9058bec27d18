// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document formatting for embedding generation.
//!
//! Converts a translation's nested book/chapter/verse JSON into index-aligned
//! sequences of document strings and verse records. The document and query
//! markers follow the asymmetric convention of nomic-embed-text-v1.5: indexed
//! text is prefixed with `search_document:` and queries with `search_query:`.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Prefix for documents added to an index.
pub const DOCUMENT_MARKER: &str = "search_document: ";

/// Prefix for query text at search time.
pub const QUERY_MARKER: &str = "search_query: ";

/// Metadata record for one verse, persisted as the k-th entry of a
/// translation's metadata array where k is the verse's index key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRecord {
    pub book: String,
    pub chapter: String,
    pub verse: String,
    pub text: String,
    pub translation: String,
}

/// Normalizes typographic quotation marks and apostrophes to plain ASCII.
pub fn sanitize(text: &str) -> String {
    text.replace(['\u{201c}', '\u{201d}'], "\"")
        .replace(['\u{2019}', '\u{2018}'], "'")
}

/// Formats every verse of one book, in source chapter/verse order.
///
/// Returns two same-length sequences: document strings for the embedding
/// model and the parallel verse records. Malformed input is a fatal error.
pub fn format_book(
    book: &str,
    content: &Value,
    translation: &str,
) -> Result<(Vec<String>, Vec<VerseRecord>)> {
    let chapters = content
        .as_object()
        .ok_or_else(|| anyhow!("book '{book}' is not an object of chapters"))?;

    let mut documents = Vec::new();
    let mut metadata = Vec::new();

    for (chapter, verses) in chapters {
        debug!("formatting {book} {chapter}");
        let verses = verses
            .as_object()
            .ok_or_else(|| anyhow!("chapter '{book} {chapter}' is not an object of verses"))?;

        for (verse, text) in verses {
            let text = text.as_str().ok_or_else(|| {
                anyhow!("verse '{book} {chapter}:{verse}' is not a text value")
            })?;
            let text = sanitize(text);

            documents.push(format!("{DOCUMENT_MARKER}{book} {chapter}:{verse} {text}"));
            metadata.push(VerseRecord {
                book: book.to_string(),
                chapter: chapter.clone(),
                verse: verse.clone(),
                text,
                translation: translation.to_string(),
            });
        }
    }

    Ok((documents, metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_maps_typographic_quotes() {
        assert_eq!(sanitize("\u{201c}Let there be light\u{201d}"), "\"Let there be light\"");
        assert_eq!(sanitize("God\u{2019}s \u{2018}word\u{2019}"), "God's 'word'");
    }

    #[test]
    fn test_sanitize_leaves_other_text_alone() {
        let plain = "In the beginning God created the heavens and the earth.";
        assert_eq!(sanitize(plain), plain);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let input = "\u{201c}I am\u{201d} he said\u{2019}";
        let once = sanitize(input);
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_format_book_aligns_documents_and_metadata() {
        let content = json!({
            "1": {
                "1": "In the beginning",
                "2": "And the earth was void",
            },
            "2": {
                "1": "Thus the heavens were finished",
            },
        });

        let (documents, metadata) =
            format_book("Genesis", &content, "King James Version").unwrap();

        assert_eq!(documents.len(), 3);
        assert_eq!(metadata.len(), 3);
        assert_eq!(
            documents[0],
            "search_document: Genesis 1:1 In the beginning"
        );
        assert_eq!(metadata[0].book, "Genesis");
        assert_eq!(metadata[0].chapter, "1");
        assert_eq!(metadata[0].verse, "1");
        assert_eq!(metadata[0].translation, "King James Version");
        assert_eq!(metadata[2].chapter, "2");
    }

    #[test]
    fn test_format_book_preserves_source_order() {
        // preserve_order keeps insertion order, not lexicographic order
        let content = json!({
            "10": { "1": "later chapter" },
            "2": { "1": "earlier chapter" },
        });

        let (_, metadata) = format_book("Psalms", &content, "World English Bible").unwrap();
        assert_eq!(metadata[0].chapter, "10");
        assert_eq!(metadata[1].chapter, "2");
    }

    #[test]
    fn test_format_book_is_idempotent() {
        let content = json!({ "1": { "1": "\u{201c}quoted\u{201d}" } });
        let first = format_book("John", &content, "English Standard Version").unwrap();
        let second = format_book("John", &content, "English Standard Version").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_format_book_rejects_malformed_chapter() {
        let content = json!({ "1": "not an object" });
        assert!(format_book("Genesis", &content, "KJV").is_err());
    }

    #[test]
    fn test_format_book_rejects_malformed_verse() {
        let content = json!({ "1": { "1": 42 } });
        assert!(format_book("Genesis", &content, "KJV").is_err());
    }
}
