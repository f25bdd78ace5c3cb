//! Filename sanitization for article titles

use std::collections::HashSet;

/// Characters dropped from generated file names
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Characters that separate words and become underscores
const SEPARATOR_CHARS: &[char] = &[' ', '/', '\\'];

/// Maximum length of a sanitized name, in characters
pub const MAX_FILENAME_CHARS: usize = 100;

/// Longest file name most filesystems accept, in bytes
pub const MAX_FILENAME_BYTES: usize = 255;

/// Fallback used when nothing survives sanitization
pub const FALLBACK_FILENAME: &str = "article";

/// Convert an article title into a safe file stem
///
/// Removes `< > : " | ? *` and control characters, turns spaces and path separators (`/`, `\`)
/// into underscores so no directory component can survive, and truncates
/// to [`MAX_FILENAME_CHARS`] characters. Returns [`FALLBACK_FILENAME`] if
/// the result is empty.
pub fn sanitize_filename(title: &str) -> String {
    let safe: String = title
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c) && !c.is_control())
        .map(|c| if SEPARATOR_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_FILENAME_CHARS)
        .collect();

    if safe.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        safe
    }
}

/// Pick `<stem>.<ext>`, or `<stem>_<n>.<ext>` if that name is already taken
///
/// Names are compared case-insensitively so the result stays unique on
/// case-insensitive filesystems and inside archives. The chosen name is
/// recorded in `taken`. The stem is shortened on a char boundary so the
/// whole name stays within [`MAX_FILENAME_BYTES`].
pub fn unique_file_name(stem: &str, extension: &str, taken: &mut HashSet<String>) -> String {
    let mut candidate = bounded_name(stem, "", extension);
    let mut counter = 2;
    while taken.contains(&candidate.to_lowercase()) {
        candidate = bounded_name(stem, &format!("_{}", counter), extension);
        counter += 1;
    }
    taken.insert(candidate.to_lowercase());
    candidate
}

fn bounded_name(stem: &str, suffix: &str, extension: &str) -> String {
    let budget = MAX_FILENAME_BYTES.saturating_sub(suffix.len() + extension.len() + 1);
    let mut end = stem.len().min(budget);
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}.{}", &stem[..end], suffix, extension)
}
