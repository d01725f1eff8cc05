//! Accept-Language parsing and language matching.

use serde::Serialize;
use std::cmp::Ordering;

/// One entry of an Accept-Language header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguagePreference {
    /// Language tag as sent by the client (casing preserved)
    pub tag: String,

    /// Quality weight; 1.0 when absent or unparseable
    pub quality: f32,
}

impl LanguagePreference {
    pub fn new(tag: impl Into<String>, quality: f32) -> Self {
        Self {
            tag: tag.into(),
            quality,
        }
    }
}

/// Parse an Accept-Language header (`pl,fr-FR;q=0.3,en-US;q=0.1`).
///
/// The result is sorted by descending quality. The sort is stable, so
/// entries with equal quality keep their header order. An empty header
/// yields an empty list.
pub fn parse_accept_language(header: &str) -> Vec<LanguagePreference> {
    let mut preferences: Vec<LanguagePreference> = header
        .split(',')
        .filter_map(|raw| {
            let mut parts = raw.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() {
                return None;
            }
            let quality = parts
                .next()
                .and_then(|param| param.trim().strip_prefix("q="))
                .and_then(|value| value.trim().parse::<f32>().ok())
                .filter(|q| q.is_finite())
                .unwrap_or(1.0);
            Some(LanguagePreference::new(tag, quality))
        })
        .collect();

    preferences.sort_by(|a, b| b.quality.partial_cmp(&a.quality).unwrap_or(Ordering::Equal));
    preferences
}

/// Pick the best supported language for an ordered preference list.
///
/// For each preference, in order, an exact (case-insensitive) match wins and
/// is returned in the client's casing. Failing that, the bare language subtag
/// is tried and returned as the subtag itself. When nothing matches,
/// `fallback` is returned.
pub fn best_language<S: AsRef<str>>(
    preferences: &[LanguagePreference],
    supported: &[S],
    fallback: &str,
) -> String {
    let lower: Vec<String> = supported
        .iter()
        .map(|lang| lang.as_ref().to_lowercase())
        .collect();

    for preference in preferences {
        if lower.contains(&preference.tag.to_lowercase()) {
            return preference.tag.clone();
        }
        // Match the language even when the region isn't supported
        let language = preference.tag.split('-').next().unwrap_or_default();
        if lower.contains(&language.to_lowercase()) {
            return language.to_string();
        }
    }

    fallback.to_string()
}

/// Every preference after the first one, as tags.
pub fn other_preferences(preferences: &[LanguagePreference]) -> Vec<String> {
    preferences
        .iter()
        .skip(1)
        .map(|preference| preference.tag.clone())
        .collect()
}

/// The subset of `others` present verbatim in `supported`, in `others` order.
pub fn alternate_supported<S: AsRef<str>>(others: &[String], supported: &[S]) -> Vec<String> {
    others
        .iter()
        .filter(|lang| supported.iter().any(|s| s.as_ref() == lang.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(preferences: &[LanguagePreference]) -> Vec<&str> {
        preferences.iter().map(|p| p.tag.as_str()).collect()
    }

    // ==================== Parser Tests ====================

    #[test]
    fn test_parse_orders_by_quality() {
        let prefs = parse_accept_language("pl,fr-FR;q=0.3,en-US;q=0.1");
        assert_eq!(tags(&prefs), vec!["pl", "fr-FR", "en-US"]);
        assert_eq!(prefs[0].quality, 1.0);
        assert_eq!(prefs[1].quality, 0.3);
        assert_eq!(prefs[2].quality, 0.1);
    }

    #[test]
    fn test_parse_sorts_descending() {
        let prefs = parse_accept_language("en;q=0.2,th,es;q=0.6");
        assert_eq!(tags(&prefs), vec!["th", "es", "en"]);
    }

    #[test]
    fn test_parse_ties_keep_header_order() {
        let prefs = parse_accept_language("de;q=0.5,fr;q=0.5,it,es;q=0.5");
        assert_eq!(tags(&prefs), vec!["it", "de", "fr", "es"]);
    }

    #[test]
    fn test_parse_unparseable_quality_defaults_to_one() {
        let prefs = parse_accept_language("fr;q=abc,en;q=0.9");
        assert_eq!(tags(&prefs), vec!["fr", "en"]);
        assert_eq!(prefs[0].quality, 1.0);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let prefs = parse_accept_language(" en-US , fr ; q=0.4");
        assert_eq!(tags(&prefs), vec!["en-US", "fr"]);
        assert_eq!(prefs[1].quality, 0.4);
    }

    #[test]
    fn test_parse_empty_header() {
        assert!(parse_accept_language("").is_empty());
        assert!(parse_accept_language(" , ").is_empty());
    }

    // ==================== Matcher Tests ====================

    #[test]
    fn test_best_language_exact_match_first_preference() {
        let prefs = vec![
            LanguagePreference::new("th", 1.0),
            LanguagePreference::new("en", 0.8),
        ];
        let supported = ["en-US", "en-CA", "th"];
        assert_eq!(best_language(&prefs, &supported, "en-US"), "th");
    }

    #[test]
    fn test_best_language_bare_subtag_fallback() {
        let prefs = vec![LanguagePreference::new("en-GB", 1.0)];
        assert_eq!(best_language(&prefs, &["en"], "fr"), "en");
    }

    /// The bare-subtag tier only matches a bare supported entry, so `en-GB`
    /// does not reach `en-US` on its own (configure an `en` alias for that).
    #[test]
    fn test_best_language_subtag_tier_needs_bare_entry() {
        let prefs = vec![LanguagePreference::new("en-GB", 1.0)];
        assert_eq!(best_language(&prefs, &["en-US"], "unknown"), "unknown");
    }

    #[test]
    fn test_best_language_keeps_client_casing() {
        let prefs = vec![LanguagePreference::new("EN-ca", 1.0)];
        assert_eq!(best_language(&prefs, &["en-CA"], "en-US"), "EN-ca");

        let prefs = vec![LanguagePreference::new("TH-th", 1.0)];
        assert_eq!(best_language(&prefs, &["th"], "en-US"), "TH");
    }

    #[test]
    fn test_best_language_per_preference_tiers() {
        // The subtag tier of an earlier preference beats an exact later one
        let prefs = vec![
            LanguagePreference::new("th-TH", 1.0),
            LanguagePreference::new("en-US", 0.9),
        ];
        assert_eq!(best_language(&prefs, &["en-US", "th"], "en-US"), "th");
    }

    #[test]
    fn test_best_language_fallback() {
        let prefs = parse_accept_language("de,fr;q=0.5");
        assert_eq!(best_language(&prefs, &["en-US"], "en-US"), "en-US");
        assert_eq!(best_language(&[], &["en-US"], "unknown"), "unknown");
    }

    // ==================== Preference Helper Tests ====================

    #[test]
    fn test_other_preferences() {
        let prefs = vec![
            LanguagePreference::new("th", 1.0),
            LanguagePreference::new("en", 0.8),
            LanguagePreference::new("es", 0.6),
        ];
        assert_eq!(other_preferences(&prefs), vec!["en", "es"]);
        assert!(other_preferences(&[]).is_empty());
    }

    #[test]
    fn test_alternate_supported() {
        let others: Vec<String> = ["th", "en-CA", "es", "fr", "ar"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let supported = ["en-US", "en-CA", "th"];
        assert_eq!(alternate_supported(&others, &supported), vec!["th", "en-CA"]);
    }
}
