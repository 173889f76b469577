//! Migration name sanitization.
//!
//! Turns a free-form migration name ("Add users table", "créer índice") into
//! a slug usable in a file name and, behind the `m<version>_` prefix, in a
//! Rust module name.

use deunicode::deunicode;

/// Default fallback name when sanitization produces an empty result.
pub const FALLBACK_NAME: &str = "migration";

/// Maximum slug length; keeps generated file names well under filesystem limits.
pub const MAX_SLUG_LENGTH: usize = 64;

/// Sanitizes a migration name into a lower-case snake_case slug.
///
/// Applies the following transformations in order:
/// 1. Unicode → ASCII transliteration
/// 2. ASCII letters lower-cased, digits kept
/// 3. Every other run of characters collapsed to a single `_`
/// 4. Leading/trailing underscores trimmed, length capped
/// 5. Empty results → "migration" fallback
pub fn slugify(input: &str) -> String {
    let ascii = deunicode(input);

    let mut result = String::with_capacity(ascii.len());
    let mut last_was_separator = true;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_separator = false;
        } else if !last_was_separator {
            result.push('_');
            last_was_separator = true;
        }
    }

    let mut slug = result.trim_matches('_').to_string();
    if slug.len() > MAX_SLUG_LENGTH {
        slug.truncate(MAX_SLUG_LENGTH);
        slug = slug.trim_end_matches('_').to_string();
    }

    if slug.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        slug
    }
}
