//! Internationalization (i18n) module for multi-language web applications.
//!
//! Negotiates a visitor's language against the configured set, loads
//! per-locale string tables from disk, and provides the lookup and
//! formatting helpers handlers use while rendering.
//!
//! # Architecture
//!
//! - `codes`: Conversion between `en-US` language tags and `en_US` locale ids
//! - `negotiation`: Accept-Language parsing and best-match selection
//! - `registry`: Static display names and date-library locale names
//! - `store`: Per-locale string tables loaded from the translation directory
//! - `gettext`: Key lookup with default-locale fallback, lenient or strict
//! - `format`: `%s` / `%(name)s` interpolation
//! - `resolver`: Per-request locale resolution into a `LocaleContext`
//!
//! # Example
//!
//! ```rust,ignore
//! use i18n_middleware::config::I18nConfig;
//! use i18n_middleware::i18n::{LocaleResolver, TranslationStore};
//!
//! let config = I18nConfig::new(["en-US", "en-CA"], "locale");
//! let store = Arc::new(TranslationStore::load(&config)?);
//! let resolver = LocaleResolver::new(store);
//!
//! let context = resolver.negotiate(Some("en-CA,en;q=0.8"));
//! assert_eq!(context.locale, "en_CA");
//! ```

pub mod codes;
pub mod format;
pub mod gettext;
pub mod negotiation;
mod registry;
mod resolver;
mod store;

pub use codes::{bare_language, locale_to_tag, tag_to_locale};
pub use format::format;
pub use gettext::LookupOptions;
pub use negotiation::{best_language, parse_accept_language, LanguagePreference};
pub use registry::{LanguageConfig, LanguageRegistry, UNKNOWN_NAME};
pub use resolver::{
    BoundHelpers, Gettext, LocaleContext, LocaleOverride, LocaleResolver, PreferredLocale,
    RequestLocale, TextDirection, FORMAT_FN_NAME,
};
pub use store::{read_language_dir, StringTable, TranslationStore};
