//! Language registry: static metadata for known language tags.
//!
//! Holds the English and native display names of every language tag the
//! layer knows about, plus the locale names understood by the client-side
//! date library. It uses a singleton pattern with `OnceLock`, initialised on
//! first access and immutable thereafter. Per-deployment additions (alias
//! mappings) live in the translation store, not here.

use crate::i18n::codes::locale_to_tag;
use std::sync::OnceLock;

/// Display name returned for tags missing from the registry.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Metadata for a known language tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Language tag in hyphen form (e.g., "en-US", "th")
    pub code: &'static str,

    /// English name of the language (e.g., "Thai")
    pub name: &'static str,

    /// Native name of the language (e.g., "ไทย")
    pub native_name: &'static str,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
    date_locales: Vec<&'static str>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
            date_locales: DATE_LOCALES.to_vec(),
        })
    }

    /// Get a language configuration by its exact tag.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Look up a tag given in either tag or locale form (`th-TH`, `en_US`).
    pub fn lookup(&self, tag_or_locale: &str) -> Option<&LanguageConfig> {
        self.get_by_code(&locale_to_tag(tag_or_locale))
    }

    /// All known languages.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Native display name, or [`UNKNOWN_NAME`].
    pub fn native_name_for(&self, tag_or_locale: &str) -> &'static str {
        self.lookup(tag_or_locale)
            .map(|lang| lang.native_name)
            .unwrap_or(UNKNOWN_NAME)
    }

    /// English display name, or [`UNKNOWN_NAME`].
    pub fn english_name_for(&self, tag_or_locale: &str) -> &'static str {
        self.lookup(tag_or_locale)
            .map(|lang| lang.name)
            .unwrap_or(UNKNOWN_NAME)
    }

    /// Map a language tag onto the date library's locale naming.
    ///
    /// `en-CA` -> `en-ca`, `th-TH` -> `th`, `en-US` -> `en`. Unknown languages
    /// map to `en`.
    pub fn date_locale_for(&self, tag: &str) -> String {
        let lower = tag.to_lowercase();
        if self.date_locales.contains(&lower.as_str()) {
            return lower;
        }
        let language: String = lower.chars().take(2).collect();
        if self.date_locales.contains(&language.as_str()) {
            return language;
        }
        "en".to_string()
    }
}

/// Locale names shipped by the client-side date library.
const DATE_LOCALES: &[&str] = &[
    "ar", "ar-ma", "ar-sa", "az", "be", "bg", "bn", "bs", "ca", "cs", "cy", "da", "de", "de-at",
    "el", "en-au", "en-ca", "en-gb", "eo", "es", "et", "eu", "fa", "fi", "fo", "fr", "fr-ca",
    "gl", "he", "hi", "hr", "hu", "hy-am", "id", "is", "it", "ja", "ka", "km", "ko", "lb", "lt",
    "lv", "mk", "ml", "mr", "ms-my", "nb", "ne", "nl", "nn", "pl", "pt", "pt-br", "ro", "ru",
    "sk", "sl", "sq", "sr", "sr-cyrl", "sv", "ta", "th", "tl-ph", "tr", "tzm", "tzm-latn", "uk",
    "uz", "vi", "zh-cn", "zh-tw",
];

fn lang(code: &'static str, name: &'static str, native_name: &'static str) -> LanguageConfig {
    LanguageConfig {
        code,
        name,
        native_name,
    }
}

/// Default language metadata.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        lang("af", "Afrikaans", "Afrikaans"),
        lang("ar", "Arabic", "عربي"),
        lang("ar-SA", "Arabic (Saudi Arabia)", "العربية (السعودية)"),
        lang("bg", "Bulgarian", "Български"),
        lang("bn", "Bengali", "বাংলা"),
        lang("bn-BD", "Bengali (Bangladesh)", "বাংলা (বাংলাদেশ)"),
        lang("ca", "Catalan", "Català"),
        lang("cs", "Czech", "Čeština"),
        lang("cy", "Welsh", "Cymraeg"),
        lang("da", "Danish", "Dansk"),
        lang("de", "German", "Deutsch"),
        lang("de-AT", "German (Austria)", "Deutsch (Österreich)"),
        lang("de-CH", "German (Switzerland)", "Deutsch (Schweiz)"),
        lang("de-DE", "German (Germany)", "Deutsch (Deutschland)"),
        lang("el", "Greek", "Ελληνικά"),
        lang("en", "English", "English"),
        lang("en-AU", "English (Australian)", "English (Australian)"),
        lang("en-CA", "English (Canadian)", "English (Canadian)"),
        lang("en-GB", "English (British)", "English (British)"),
        lang("en-US", "English (US)", "English (US)"),
        lang("eo", "Esperanto", "Esperanto"),
        lang("es", "Spanish", "Español"),
        lang("es-AR", "Spanish (Argentina)", "Español (de Argentina)"),
        lang("es-CL", "Spanish (Chile)", "Español (de Chile)"),
        lang("es-ES", "Spanish (Spain)", "Español (de España)"),
        lang("es-MX", "Spanish (Mexico)", "Español (de México)"),
        lang("et", "Estonian", "Eesti keel"),
        lang("eu", "Basque", "Euskara"),
        lang("fa", "Persian", "فارسی"),
        lang("fa-IR", "Persian (Iran)", "فارسی (ایران)"),
        lang("fi", "Finnish", "suomi"),
        lang("fr", "French", "Français"),
        lang("fr-CA", "French (Canada)", "Français (Canada)"),
        lang("fr-FR", "French (France)", "Français (France)"),
        lang("ga", "Irish", "Gaeilge"),
        lang("gl", "Galician", "Galego"),
        lang("he", "Hebrew", "עברית"),
        lang("he-IL", "Hebrew (Israel)", "עברית (ישראל)"),
        lang("hi", "Hindi", "हिन्दी"),
        lang("hi-IN", "Hindi (India)", "हिन्दी (भारत)"),
        lang("hr", "Croatian", "Hrvatski"),
        lang("hu", "Hungarian", "magyar"),
        lang("id", "Indonesian", "Bahasa Indonesia"),
        lang("is", "Icelandic", "íslenska"),
        lang("it", "Italian", "Italiano"),
        lang("ja", "Japanese", "日本語"),
        lang("ka", "Georgian", "ქართული"),
        lang("km", "Khmer", "ខ្មែរ"),
        lang("ko", "Korean", "한국어"),
        lang("lt", "Lithuanian", "lietuvių kalba"),
        lang("lv", "Latvian", "Latviešu"),
        lang("mk", "Macedonian", "Македонски"),
        lang("ml", "Malayalam", "മലയാളം"),
        lang("ms", "Malay", "Melayu"),
        lang("nb-NO", "Norwegian (Bokmål)", "Norsk bokmål"),
        lang("nl", "Dutch", "Nederlands"),
        lang("nn-NO", "Norwegian (Nynorsk)", "Norsk nynorsk"),
        lang("nqo", "N'ko", "ߒߞߏ"),
        lang("pl", "Polish", "Polski"),
        lang("pt", "Portuguese", "Português"),
        lang("pt-BR", "Portuguese (Brazilian)", "Português (do Brasil)"),
        lang("pt-PT", "Portuguese (Portugal)", "Português (Europeu)"),
        lang("ro", "Romanian", "Română"),
        lang("ru", "Russian", "Русский"),
        lang("sk", "Slovak", "slovenčina"),
        lang("sl", "Slovenian", "Slovenščina"),
        lang("sq", "Albanian", "Shqip"),
        lang("sr", "Serbian", "Српски"),
        lang("sr-RS", "Serbian (Serbia)", "Српски (Србија)"),
        lang("sv", "Swedish", "Svenska"),
        lang("sv-SE", "Swedish (Sweden)", "Svenska (Sverige)"),
        lang("sw", "Swahili", "Kiswahili"),
        lang("ta", "Tamil", "தமிழ்"),
        lang("th", "Thai", "ไทย"),
        lang("th-TH", "Thai (Thailand)", "ไทย (ประเทศไทย)"),
        lang("tl", "Tagalog", "Tagalog"),
        lang("tr", "Turkish", "Türkçe"),
        lang("uk", "Ukrainian", "Українська"),
        lang("ur", "Urdu", "اُردو"),
        lang("ur-PK", "Urdu (Pakistan)", "اُردو (پاکستان)"),
        lang("vi", "Vietnamese", "Tiếng Việt"),
        lang("zh-CN", "Chinese (Simplified)", "中文 (简体)"),
        lang("zh-TW", "Chinese (Traditional)", "正體中文 (繁體)"),
    ]
}
