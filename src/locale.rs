//! Locale normalization and map label fallback.
//!
//! Only the primary subtag of a requested locale matters: `en-US`, `en_GB`
//! and `en` all resolve against the `en` title of a map descriptor.

use crate::catalog::MapDefinition;

/// Locale every label lookup falls back to before using the map id.
pub const FALLBACK_LOCALE: &str = "en";

/// Reduce a locale string to its first two characters.
///
/// Inputs shorter than two characters are returned whole; the cut is made on
/// character boundaries so non-ASCII input cannot split a code point.
pub fn normalize_locale(locale: &str) -> &str {
    match locale.char_indices().nth(2) {
        Some((end, _)) => &locale[..end],
        None => locale,
    }
}

/// Resolve the human label for `definition` in `requested_locale`.
///
/// Tries the normalized locale, then English, then the map id verbatim.
/// Empty titles and the literal `"0"` are treated as absent; whitespace-only
/// titles are kept.
pub fn resolve_label<'a>(definition: &'a MapDefinition, requested_locale: &str) -> &'a str {
    let locale = normalize_locale(requested_locale);
    title_for(definition, locale)
        .or_else(|| title_for(definition, FALLBACK_LOCALE))
        .unwrap_or(definition.id.as_str())
}

fn title_for<'a>(definition: &'a MapDefinition, locale: &str) -> Option<&'a str> {
    definition
        .title
        .get(locale)
        .map(String::as_str)
        .filter(|title| !title.is_empty() && *title != "0")
}
