//! Conversion between language tags (`en-US`) and locale identifiers (`en_US`).
//!
//! Locale identifiers key the translation tables, language tags are what
//! clients send and what the rest of the API reports. Three-segment tags
//! (`sr-Cyrl-RS`) collapse to language and region; the script is dropped and
//! cannot be recovered.

use tracing::error;

/// Convert a language tag into a locale identifier.
///
/// `en-US` becomes `en_US`, `sr-Cyrl-RS` becomes `sr_RS`. Input without a
/// hyphen is returned unchanged if already in locale form (`en_US`), and
/// lowercased otherwise. Tags with more than three segments cannot be mapped
/// and are returned as given.
pub fn tag_to_locale(tag: &str) -> String {
    if tag.is_empty() {
        return String::new();
    }
    if !tag.contains('-') {
        if tag.contains('_') {
            return tag.to_string();
        }
        return tag.to_lowercase();
    }

    let parts: Vec<&str> = tag.split('-').collect();
    match parts.as_slice() {
        [language, region] | [language, _, region] => {
            format!("{}_{}", language.to_lowercase(), region.to_uppercase())
        }
        _ => {
            error!("Unable to map a locale from language code [{}]", tag);
            tag.to_string()
        }
    }
}

/// Convert a locale identifier (or a tag in either form) into a language tag.
///
/// Accepts `_` or `-` as separator: `en_US` and `en-us` both become `en-US`.
pub fn locale_to_tag(locale: &str) -> String {
    if locale.is_empty() {
        return String::new();
    }

    let parts: Vec<&str> = locale.split(['-', '_']).collect();
    match parts.as_slice() {
        [language] => language.to_lowercase(),
        [language, region] | [language, _, region] => {
            format!("{}-{}", language.to_lowercase(), region.to_uppercase())
        }
        _ => {
            error!("Unable to map a language from locale code [{}]", locale);
            locale.to_string()
        }
    }
}

/// The primary language subtag, lowercased (`en-US` -> `en`).
pub fn bare_language(tag: &str) -> String {
    tag.split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}
