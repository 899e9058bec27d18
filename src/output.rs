//! Output and color utilities for consistent terminal formatting
//!
//! Provides shared color functions respecting NO_COLOR environment variable.

use colored::Colorize;

use crate::search::SearchHit;

/// Check if colors should be used (respects NO_COLOR env var)
pub fn use_colors() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Format one search hit as `(key / distance) [translation] Book C:V text`.
pub fn format_hit_line(hit: &SearchHit, use_color: bool) -> String {
    let reference = format!(
        "{} {}:{}",
        hit.record.book, hit.record.chapter, hit.record.verse
    );
    if use_color {
        format!(
            "({} / {}) [{}] {} {}",
            hit.key.to_string().yellow(),
            hit.distance.to_string().yellow(),
            hit.record.translation.green(),
            reference.cyan(),
            hit.record.text,
        )
    } else {
        format!(
            "({} / {}) [{}] {} {}",
            hit.key, hit.distance, hit.record.translation, reference, hit.record.text,
        )
    }
}
