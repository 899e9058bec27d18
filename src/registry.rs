// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static registry of known translation codes and canonical names.
//!
//! Translations are identified on disk by the canonical name; the short codes
//! are the file stems produced by the version splitter and the aliases users
//! pass to `-t/--translation`.

use once_cell::sync::Lazy;

/// Known translation codes mapped to canonical names, in display order.
static KNOWN_CODES: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("AMP", "Amplified Bible"),
        ("ASV", "American Standard Version"),
        ("CSB", "Christian Standard Bible"),
        ("ESV", "English Standard Version"),
        ("KJV", "King James Version"),
        ("MSG", "The Message"),
        ("NASB", "New American Standard Bible"),
        ("NIV", "New International Version"),
        ("NKJV", "New King James Version"),
        ("NLT", "New Living Translation"),
        ("RSV", "Revised Standard Version"),
        ("WEB", "World English Bible"),
        ("YLT", "Young's Literal Translation"),
    ]
});

/// Resolves an alias code or a canonical name to the canonical name.
///
/// Returns `None` when the input matches neither, so callers can decide
/// between a fallback literal (indexing) and a hard error (search).
pub fn resolve(input: &str) -> Option<&'static str> {
    KNOWN_CODES
        .iter()
        .find_map(|(code, name)| (*code == input || *name == input).then_some(*name))
}

/// All canonical translation names, in registry order.
pub fn canonical_names() -> impl Iterator<Item = &'static str> {
    KNOWN_CODES.iter().map(|(_, name)| *name)
}

/// All (code, canonical name) pairs, in registry order.
pub fn entries() -> impl Iterator<Item = (&'static str, &'static str)> {
    KNOWN_CODES.iter().copied()
}
