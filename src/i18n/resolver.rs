//! Per-request locale resolution.
//!
//! A request's locale comes from, in order of precedence: a supported
//! language as the first URL path segment (which is then stripped from the
//! path), the session's preferred locale, and the Accept-Language header.
//! The negotiated tag is passed through the alias mappings and expanded into
//! a [`LocaleContext`].

use crate::error::{FormatError, I18nError, Result};
use crate::i18n::codes::{bare_language, locale_to_tag, tag_to_locale};
use crate::i18n::format;
use crate::i18n::gettext::{as_text, LookupOptions};
use crate::i18n::negotiation::{
    alternate_supported, best_language, other_preferences, parse_accept_language,
};
use crate::i18n::registry::LanguageRegistry;
use crate::i18n::store::TranslationStore;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::error;

/// Languages written right to left, matched on the bare language subtag.
const RTL_LANGUAGES: &[&str] = &[
    "ar", "ar_SA", "fa", "fa_IR", "he", "he_IL", "nqo", "ur", "ur_PK",
];

/// Default name the formatter is bound under.
pub const FORMAT_FN_NAME: &str = "format";

/// Returned by the URL-prefix match when no supported language is found.
const NO_MATCH: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// Everything request handlers need to know about the visitor's locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleContext {
    /// Negotiated language tag (e.g., "en-CA")
    pub language: String,
    pub english_name: String,
    pub native_name: String,
    /// Locale identifier of the table used for lookups (e.g., "en_CA")
    pub locale: String,
    /// Locale name for the client-side date library (e.g., "en-ca")
    pub moment_language: String,
    pub direction: TextDirection,
    /// Preferences after the first, in header order of quality
    pub other_preferred_languages: Vec<String>,
    /// `other_preferred_languages` that are configured supported languages
    pub alternate_supported_languages: Vec<String>,
}

/// The request path and Accept-Language value after URL/session overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleOverride {
    pub path: String,
    pub accept_language: Option<String>,
}

/// Names already bound on the request scope by other middleware.
#[derive(Debug, Clone, Default)]
pub struct BoundHelpers(pub HashSet<String>);

/// Preferred locale stored in the visitor's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferredLocale(pub String);

/// `gettext` bound to one locale.
///
/// Falls back to returning the key unchanged when the locale has no table.
#[derive(Debug, Clone)]
pub struct Gettext {
    store: Arc<TranslationStore>,
    locale: Option<String>,
    options: LookupOptions,
}

impl Gettext {
    pub fn new(store: Arc<TranslationStore>, locale: &str, options: LookupOptions) -> Self {
        let locale = store.has_locale(locale).then(|| locale.to_string());
        Self {
            store,
            locale,
            options,
        }
    }

    /// Resolved value, which may be a `{message}` record.
    pub fn value(&self, key: &str) -> Value {
        match &self.locale {
            Some(locale) => self.store.gettext(key, locale, self.options),
            None => Value::String(key.to_string()),
        }
    }

    pub fn get(&self, key: &str) -> String {
        as_text(&self.value(key))
    }
}

/// Locale state attached to a request once resolution is done.
#[derive(Debug, Clone)]
pub struct RequestLocale {
    pub context: LocaleContext,
    pub gettext: Gettext,
    /// Name the formatter is exposed under to templates
    pub format_fn_name: String,
}

impl RequestLocale {
    pub fn gettext(&self, key: &str) -> String {
        self.gettext.get(key)
    }

    pub fn format(
        &self,
        fmt: &str,
        data: &Value,
        named: Option<bool>,
    ) -> std::result::Result<String, FormatError> {
        format::format(fmt, data, named)
    }

    pub fn language_name_for(&self, tag: &str) -> &'static str {
        self.gettext.store.native_name_for(tag)
    }

    pub fn language_english_name(&self, tag: &str) -> &'static str {
        self.gettext.store.english_name_for(tag)
    }
}

/// Resolves the locale of incoming requests against a translation store.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    store: Arc<TranslationStore>,
    format_fn_name: Option<String>,
}

impl LocaleResolver {
    pub fn new(store: Arc<TranslationStore>) -> Self {
        Self {
            store,
            format_fn_name: None,
        }
    }

    /// Name to bind the formatter under if "format" is already taken.
    pub fn with_format_fn_name(mut self, name: Option<String>) -> Self {
        self.format_fn_name = name;
        self
    }

    pub fn store(&self) -> &Arc<TranslationStore> {
        &self.store
    }

    /// Apply the URL-prefix and session overrides.
    ///
    /// If the first path segment names a supported language, it is stripped
    /// (`/en-CA/test` -> `/test`) and becomes the Accept-Language value.
    /// Otherwise a session hint, when present, replaces the header.
    pub fn apply_overrides(
        &self,
        path: &str,
        accept_language: Option<&str>,
        session_hint: Option<&str>,
    ) -> LocaleOverride {
        let unchanged = || LocaleOverride {
            path: path.to_string(),
            accept_language: accept_language.map(str::to_string),
        };

        let Some(rest) = path.strip_prefix('/') else {
            return unchanged();
        };
        let (segment, remainder) = match rest.split_once('/') {
            Some((segment, remainder)) => (segment, remainder),
            None => (rest, ""),
        };

        let languages = self.store.languages();
        let lang = best_language(&parse_accept_language(segment), &languages, NO_MATCH);
        if lang == NO_MATCH {
            return match session_hint {
                Some(hint) => LocaleOverride {
                    path: path.to_string(),
                    accept_language: Some(hint.to_string()),
                },
                None => unchanged(),
            };
        }

        LocaleOverride {
            path: format!("/{}", remainder),
            accept_language: Some(lang),
        }
    }

    /// Negotiate an Accept-Language value into a full locale context.
    ///
    /// # Arguments
    /// * `accept_language` - Raw header value, already overridden by the URL
    ///   prefix or session hint
    ///
    /// # Returns
    /// The `LocaleContext` for the best supported language, or for the
    /// default language when nothing matches. Alias tags report themselves
    /// as `language` and resolve `locale` through their canonical target.
    pub fn negotiate(&self, accept_language: Option<&str>) -> LocaleContext {
        let preferences = parse_accept_language(accept_language.unwrap_or_default());
        let languages = self.store.languages();
        let matched = best_language(&preferences, &languages, self.store.default_language());

        let language = locale_to_tag(&matched);
        let target = self
            .store
            .mapping_for(&language)
            .map(str::to_string)
            .unwrap_or_else(|| language.clone());

        let direction = if RTL_LANGUAGES.contains(&bare_language(&target).as_str()) {
            TextDirection::Rtl
        } else {
            TextDirection::Ltr
        };

        let other_preferred_languages = other_preferences(&preferences);
        let alternate_supported_languages =
            alternate_supported(&other_preferred_languages, &self.store.supported_languages());

        LocaleContext {
            english_name: self.store.english_name_for(&language).to_string(),
            native_name: self.store.native_name_for(&language).to_string(),
            locale: tag_to_locale(&target),
            moment_language: LanguageRegistry::get().date_locale_for(&target),
            direction,
            other_preferred_languages,
            alternate_supported_languages,
            language,
        }
    }

    /// Pick the name the formatter is bound under.
    ///
    /// Taking "format" when another helper already holds it is a
    /// configuration error unless an override name was configured.
    pub fn format_binding_name(&self, bound: Option<&BoundHelpers>) -> Result<String> {
        let taken = bound.is_some_and(|b| b.0.contains(FORMAT_FN_NAME));
        if !taken {
            return Ok(FORMAT_FN_NAME.to_string());
        }
        match &self.format_fn_name {
            Some(name) => Ok(name.clone()),
            None => {
                error!(
                    "Another helper is already bound as '{}' on this request; \
                     set format_fn_name to bind the formatter under another name",
                    FORMAT_FN_NAME
                );
                Err(I18nError::Config("override format_fn_name".to_string()))
            }
        }
    }

    /// Build the request-scope locale state for a negotiated context.
    pub fn bind(
        &self,
        context: LocaleContext,
        options: LookupOptions,
        bound: Option<&BoundHelpers>,
    ) -> Result<RequestLocale> {
        let format_fn_name = self.format_binding_name(bound)?;
        let gettext = Gettext::new(Arc::clone(&self.store), &context.locale, options);
        Ok(RequestLocale {
            context,
            gettext,
            format_fn_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::I18nConfig;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_json(dir: &Path, locale: &str, value: Value) {
        let locale_dir = dir.join(locale);
        fs::create_dir_all(&locale_dir).unwrap();
        fs::write(locale_dir.join("messages.json"), value.to_string()).unwrap();
    }

    fn resolver_with(config: impl FnOnce(I18nConfig) -> I18nConfig) -> (TempDir, LocaleResolver) {
        let dir = TempDir::new().unwrap();
        write_json(dir.path(), "en_US", json!({"_Hello_World_": "Hello World", "bye": "Bye"}));
        write_json(dir.path(), "en_CA", json!({"_Hello_World_": "Hello Canada"}));
        write_json(dir.path(), "th", json!({"_Hello_World_": "สวัสดีชาวโลก"}));
        write_json(dir.path(), "ar", json!({"_Hello_World_": "مرحبا بالعالم"}));

        let config = config(I18nConfig::new(["en-US", "en-CA", "th", "ar"], dir.path()));
        let store = TranslationStore::load(&config).unwrap();
        let resolver = LocaleResolver::new(Arc::new(store)).with_format_fn_name(config.format_fn_name);
        (dir, resolver)
    }

    fn resolver() -> (TempDir, LocaleResolver) {
        resolver_with(|config| config)
    }

    // ==================== Override Tests ====================

    #[test]
    fn test_override_strips_language_prefix() {
        let (_dir, resolver) = resolver();
        let result = resolver.apply_overrides("/en-CA/test", Some("th"), None);
        assert_eq!(result.path, "/test");
        assert_eq!(result.accept_language.as_deref(), Some("en-CA"));
    }

    #[test]
    fn test_override_prefix_only_path() {
        let (_dir, resolver) = resolver();
        assert_eq!(resolver.apply_overrides("/en-CA", None, None).path, "/");
        assert_eq!(resolver.apply_overrides("/en-CA/", None, None).path, "/");
        assert_eq!(resolver.apply_overrides("/en-CA/test/", None, None).path, "/test/");
    }

    #[test]
    fn test_override_prefix_matches_bare_language() {
        let (_dir, resolver) = resolver();
        let result = resolver.apply_overrides("/th-TH/page", None, None);
        assert_eq!(result.path, "/page");
        assert_eq!(result.accept_language.as_deref(), Some("th"));
    }

    #[test]
    fn test_override_unknown_segment_keeps_header() {
        let (_dir, resolver) = resolver();
        let result = resolver.apply_overrides("/css/file.css", Some("th"), None);
        assert_eq!(result.path, "/css/file.css");
        assert_eq!(result.accept_language.as_deref(), Some("th"));
    }

    #[test]
    fn test_override_session_hint_replaces_header() {
        let (_dir, resolver) = resolver();
        let result = resolver.apply_overrides("/test", Some("th"), Some("en-CA"));
        assert_eq!(result.path, "/test");
        assert_eq!(result.accept_language.as_deref(), Some("en-CA"));
    }

    #[test]
    fn test_override_url_beats_session_hint() {
        let (_dir, resolver) = resolver();
        let result = resolver.apply_overrides("/th/test", None, Some("en-CA"));
        assert_eq!(result.accept_language.as_deref(), Some("th"));
    }

    #[test]
    fn test_override_root_path() {
        let (_dir, resolver) = resolver();
        let result = resolver.apply_overrides("/", None, None);
        assert_eq!(result.path, "/");
        assert_eq!(result.accept_language, None);
    }

    // ==================== Negotiation Tests ====================

    #[test]
    fn test_negotiate_defaults_without_header() {
        let (_dir, resolver) = resolver();
        let context = resolver.negotiate(None);
        assert_eq!(context.language, "en-US");
        assert_eq!(context.locale, "en_US");
        assert_eq!(context.direction, TextDirection::Ltr);
        assert_eq!(context.english_name, "English (US)");
        assert_eq!(context.moment_language, "en");
    }

    #[test]
    fn test_negotiate_header() {
        let (_dir, resolver) = resolver();
        let context = resolver.negotiate(Some("th,en-CA;q=0.8,es;q=0.6,fr;q=0.4"));
        assert_eq!(context.language, "th");
        assert_eq!(context.native_name, "ไทย");
        assert_eq!(context.english_name, "Thai");
        assert_eq!(context.moment_language, "th");
        assert_eq!(context.other_preferred_languages, vec!["en-CA", "es", "fr"]);
        assert_eq!(context.alternate_supported_languages, vec!["en-CA"]);
    }

    #[test]
    fn test_negotiate_normalizes_client_casing() {
        let (_dir, resolver) = resolver();
        let context = resolver.negotiate(Some("EN-ca"));
        assert_eq!(context.language, "en-CA");
        assert_eq!(context.locale, "en_CA");
        assert_eq!(context.moment_language, "en-ca");
    }

    #[test]
    fn test_negotiate_rtl() {
        let (_dir, resolver) = resolver();
        let context = resolver.negotiate(Some("ar-SA"));
        assert_eq!(context.language, "ar");
        assert_eq!(context.direction, TextDirection::Rtl);
    }

    #[test]
    fn test_negotiate_unsupported_falls_back_to_default() {
        let (_dir, resolver) = resolver();
        let context = resolver.negotiate(Some("de-DE,fr;q=0.5"));
        assert_eq!(context.language, "en-US");
        assert_eq!(context.locale, "en_US");
    }

    #[test]
    fn test_negotiate_alias_mapping() {
        let (_dir, resolver) = resolver_with(|c| c.with_mapping("en", "en-CA"));
        let context = resolver.negotiate(Some("en"));
        assert_eq!(context.language, "en");
        assert_eq!(context.locale, "en_CA");
        assert_eq!(context.english_name, "English");
    }

    #[test]
    fn test_negotiate_alias_configured_in_locale_form() {
        let (_dir, resolver) = resolver_with(|c| c.with_mapping("en_GB", "en-CA"));
        let context = resolver.negotiate(Some("en-gb"));
        assert_eq!(context.language, "en-GB");
        assert_eq!(context.locale, "en_CA");
    }

    // ==================== Binding Tests ====================

    #[test]
    fn test_bind_gettext_uses_context_locale() {
        let (_dir, resolver) = resolver();
        let context = resolver.negotiate(Some("en-CA"));
        let locale = resolver.bind(context, LookupOptions::default(), None).unwrap();
        assert_eq!(locale.gettext("_Hello_World_"), "Hello Canada");
        assert_eq!(locale.gettext("bye"), "Bye");
        assert_eq!(locale.gettext("missing"), "missing");
        assert_eq!(locale.format_fn_name, "format");
    }

    #[test]
    fn test_bind_strict_options() {
        let (_dir, resolver) = resolver();
        let context = resolver.negotiate(None);
        let locale = resolver.bind(context, LookupOptions::strict(), None).unwrap();
        assert_eq!(locale.gettext("missing"), "");
    }

    #[test]
    fn test_gettext_without_table_is_identity() {
        let (_dir, resolver) = resolver();
        let gettext = Gettext::new(Arc::clone(resolver.store()), "zz_ZZ", LookupOptions::strict());
        assert_eq!(gettext.get("_Hello_World_"), "_Hello_World_");
    }

    #[test]
    fn test_format_name_collision_without_override() {
        let (_dir, resolver) = resolver();
        let bound = BoundHelpers(HashSet::from(["format".to_string()]));
        let context = resolver.negotiate(None);
        let result = resolver.bind(context, LookupOptions::default(), Some(&bound));
        assert!(matches!(result, Err(I18nError::Config(_))));
    }

    #[test]
    fn test_format_name_collision_with_override() {
        let (_dir, resolver) = resolver_with(|c| c.with_format_fn_name("i18nFormat"));
        let bound = BoundHelpers(HashSet::from(["format".to_string()]));
        assert_eq!(resolver.format_binding_name(Some(&bound)).unwrap(), "i18nFormat");
        assert_eq!(resolver.format_binding_name(None).unwrap(), "format");
    }

    #[test]
    fn test_request_locale_helpers() {
        let (_dir, resolver) = resolver();
        let locale = resolver
            .bind(resolver.negotiate(None), LookupOptions::default(), None)
            .unwrap();
        assert_eq!(
            locale.format("%s %s", &json!(["Hello", "World"]), None).unwrap(),
            "Hello World"
        );
        assert_eq!(locale.language_name_for("th"), "ไทย");
        assert_eq!(locale.language_english_name("th-TH"), "Thai (Thailand)");
    }
}
