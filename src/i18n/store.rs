//! Translation store: locale identifier -> string table.
//!
//! Built once from the configured translation directory. Each locale lives in
//! its own directory (`<root>/en_US/*.json`) and all of its JSON files are
//! shallow-merged into one table. Alias mappings share the canonical
//! locale's table. Tables can be extended at runtime; the state sits behind
//! an `RwLock` so request handlers may keep reading while that happens.

use crate::config::I18nConfig;
use crate::error::{I18nError, Result};
use crate::i18n::codes::{locale_to_tag, tag_to_locale};
use crate::i18n::gettext::{self, LookupOptions};
use crate::i18n::registry::{LanguageConfig, LanguageRegistry, UNKNOWN_NAME};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info, warn};

/// Flat key -> value table for one locale.
pub type StringTable = Map<String, Value>;

/// Files with this prefix in a locale directory are not string files.
const META_PREFIX: &str = "meta-";

#[derive(Debug, Default)]
struct StoreState {
    /// Tables, shared between a locale and its aliases by index
    tables: Vec<StringTable>,

    /// Locale identifier -> index into `tables`
    locales: BTreeMap<String, usize>,

    /// Tags matched against client preferences, aliases included
    languages: Vec<String>,

    /// Configured tags that loaded; `None` until the store is set up
    supported: Option<Vec<String>>,

    /// Display metadata borrowed by aliases missing from the registry
    alias_names: HashMap<String, &'static LanguageConfig>,
}

impl StoreState {
    fn table(&self, locale: &str) -> Option<&StringTable> {
        self.locales.get(locale).map(|&index| &self.tables[index])
    }
}

/// Process-wide string tables for one deployment.
#[derive(Debug)]
pub struct TranslationStore {
    default_language: String,
    default_locale: String,
    mappings: BTreeMap<String, String>,
    state: RwLock<StoreState>,
}

impl Default for TranslationStore {
    /// An empty store that has not been set up.
    fn default() -> Self {
        let default_language = crate::config::DEFAULT_LANGUAGE.to_string();
        Self {
            default_locale: tag_to_locale(&default_language),
            default_language,
            mappings: BTreeMap::new(),
            state: RwLock::new(StoreState::default()),
        }
    }
}

impl TranslationStore {
    /// Build the store from configuration, reading every locale from disk.
    ///
    /// Locales that fail to load are dropped from the supported set, except
    /// the default locale, whose failure is fatal. Alias mappings whose
    /// canonical locale did not load are skipped.
    ///
    /// # Arguments
    /// * `config` - Supported languages, translation directory, default
    ///   language and alias mappings
    ///
    /// # Returns
    /// * `Ok(TranslationStore)` with every loadable locale in memory
    /// * `Err(I18nError::Config)` for invalid configuration or an unknown
    ///   default language
    /// * `Err(I18nError::DefaultLocale)` if the default locale cannot be read
    pub fn load(config: &I18nConfig) -> Result<Self> {
        config.validate()?;

        let root = &config.translation_directory;
        let supported = if config.is_wildcard() {
            let mut names: Vec<String> = fs::read_dir(root)
                .map_err(|source| I18nError::Io {
                    path: root.clone(),
                    source,
                })?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            read_language_dir(root, &names)
        } else {
            config.supported_languages.clone()
        };

        if !supported.contains(&config.default_language) {
            return Err(I18nError::Config(format!(
                "unknown default_language [{}]",
                config.default_language
            )));
        }

        let default_locale = tag_to_locale(&config.default_language);
        let mut state = StoreState::default();
        let mut loaded = Vec::with_capacity(supported.len());

        for lang in supported {
            let locale = tag_to_locale(&lang);
            let path = root.join(&locale);
            match load_locale_dir(&path) {
                Ok(table) => {
                    debug!("Loaded {} strings for locale {}", table.len(), locale);
                    state.tables.push(table);
                    state.locales.insert(locale, state.tables.len() - 1);
                    loaded.push(lang);
                }
                Err(source) if locale == default_locale => {
                    return Err(I18nError::DefaultLocale {
                        locale,
                        path,
                        source,
                    });
                }
                Err(e) => {
                    error!(
                        "Bad locale=[{}] missing .json files in [{}], dropping it: {}",
                        locale,
                        path.display(),
                        e
                    );
                }
            }
        }

        state.languages = loaded.clone();
        state.supported = Some(loaded);

        // Aliases are keyed by tag so any configured spelling matches
        let mappings: BTreeMap<String, String> = config
            .mappings
            .iter()
            .map(|(alias, canonical)| (locale_to_tag(alias), canonical.clone()))
            .collect();

        let registry = LanguageRegistry::get();
        for (alias_tag, canonical) in &mappings {
            let canonical_locale = tag_to_locale(canonical);
            let Some(&index) = state.locales.get(&canonical_locale) else {
                if config.warnings {
                    warn!("Unknown language mapping [{}] -> [{}], skipping", alias_tag, canonical);
                } else {
                    debug!("Unknown language mapping [{}] -> [{}], skipping", alias_tag, canonical);
                }
                continue;
            };

            state.locales.insert(tag_to_locale(alias_tag), index);
            if registry.get_by_code(alias_tag).is_none() {
                if let Some(canonical_config) = registry.lookup(canonical) {
                    state.alias_names.insert(alias_tag.clone(), canonical_config);
                }
            }
            state.languages.push(alias_tag.clone());
        }

        info!(
            "Translation store ready: {} locales, languages {:?}",
            state.locales.len(),
            state.languages
        );

        Ok(Self {
            default_language: config.default_language.clone(),
            default_locale,
            mappings,
            state: RwLock::new(state),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Canonical tag configured for an alias, in tag or locale form.
    pub fn mapping_for(&self, alias: &str) -> Option<&str> {
        self.mappings.get(&locale_to_tag(alias)).map(String::as_str)
    }

    /// Locale identifiers with a table, aliases included.
    pub fn locales(&self) -> Vec<String> {
        self.read().locales.keys().cloned().collect()
    }

    /// Tags matched against client preferences, aliases included.
    pub fn languages(&self) -> Vec<String> {
        self.read().languages.clone()
    }

    /// Configured tags that loaded successfully, aliases excluded.
    pub fn supported_languages(&self) -> Vec<String> {
        self.read().supported.clone().unwrap_or_default()
    }

    /// Whether a table exists for a locale (tag or locale form).
    pub fn has_locale(&self, locale: &str) -> bool {
        self.read().locales.contains_key(&tag_to_locale(locale))
    }

    /// Look up `key` for a locale, falling back to the default locale.
    pub fn gettext(&self, key: &str, locale: &str, options: LookupOptions) -> Value {
        let state = self.read();
        let localized = state
            .table(&tag_to_locale(locale))
            .and_then(|table| table.get(key));
        let fallback = state
            .table(&self.default_locale)
            .and_then(|table| table.get(key));
        gettext::resolve(key, localized, fallback, options)
    }

    /// Every default-locale key resolved for `lang`.
    ///
    /// The default locale's keys are authoritative, so keys missing from a
    /// translation still appear. A locale with no table yields an empty map.
    ///
    /// # Arguments
    /// * `lang` - Language tag or locale identifier (e.g., "en-CA", "en_CA")
    /// * `options` - Lenient or strict lookup
    ///
    /// # Returns
    /// A key -> string map covering the default locale's key set.
    pub fn get_strings(&self, lang: &str, options: LookupOptions) -> Map<String, Value> {
        let state = self.read();
        let locale = tag_to_locale(lang);
        let Some(localized) = state.table(&locale) else {
            return Map::new();
        };
        let Some(defaults) = state.table(&self.default_locale) else {
            return Map::new();
        };

        defaults
            .iter()
            .map(|(key, fallback)| {
                let value = gettext::resolve(key, localized.get(key), Some(fallback), options);
                (key.clone(), value)
            })
            .collect()
    }

    /// Merge runtime strings into the loaded tables.
    ///
    /// `object` maps language tags to key/value objects. Every supported
    /// language is extended with the entry under its own tag. Entries that
    /// are not objects are skipped.
    ///
    /// # Arguments
    /// * `object` - Language tag -> key/value object, e.g.
    ///   `{"en-US": {"greeting": "Hi"}}`
    ///
    /// # Returns
    /// * `Ok(())` once every matching entry is merged
    /// * `Err(I18nError::Config)` if the store was never set up
    pub fn extend(&self, object: &Map<String, Value>) -> Result<()> {
        let mut state = self.write();
        let Some(supported) = state.supported.clone() else {
            return Err(I18nError::Config(
                "supported languages are undefined, extend the store after setup".to_string(),
            ));
        };

        for lang in supported {
            let Some(entry) = object.get(&lang) else {
                continue;
            };
            let Value::Object(strings) = entry else {
                warn!("Skipping non-object strings for [{}]", lang);
                continue;
            };
            let Some(&index) = state.locales.get(&tag_to_locale(&lang)) else {
                continue;
            };
            state.tables[index].extend(strings.clone());
        }

        Ok(())
    }

    /// Native display name for a tag, honouring alias mappings.
    pub fn native_name_for(&self, tag: &str) -> &'static str {
        self.language_config(tag)
            .map(|lang| lang.native_name)
            .unwrap_or(UNKNOWN_NAME)
    }

    /// English display name for a tag, honouring alias mappings.
    pub fn english_name_for(&self, tag: &str) -> &'static str {
        self.language_config(tag)
            .map(|lang| lang.name)
            .unwrap_or(UNKNOWN_NAME)
    }

    fn language_config(&self, tag: &str) -> Option<&'static LanguageConfig> {
        let registry = LanguageRegistry::get();
        registry
            .lookup(tag)
            .or_else(|| self.read().alias_names.get(&locale_to_tag(tag)).copied())
    }
}

/// Keep the entries of `names` that are directories under `dir`, as tags.
///
/// `["en_US", "en_CA", ".DS_Store"]` -> `["en-US", "en-CA"]`.
pub fn read_language_dir(dir: &Path, names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|name| dir.join(name).is_dir())
        .map(|name| locale_to_tag(name))
        .collect()
}

/// Load and merge every string file in one locale directory.
///
/// Fails only if the directory itself cannot be read. Malformed files are
/// logged and skipped. Files merge in name order; later keys win.
fn load_locale_dir(path: &Path) -> std::io::Result<StringTable> {
    let mut files: Vec<PathBuf> = fs::read_dir(path)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|file| is_string_file(file))
        .collect();
    files.sort();

    let mut table = StringTable::new();
    for file in files {
        match read_string_file(&file) {
            Ok(strings) => table.extend(strings),
            Err(e) => error!("Skipping locale file [{}]: {}", file.display(), e),
        }
    }
    Ok(table)
}

fn is_string_file(path: &Path) -> bool {
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let is_meta = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(META_PREFIX));
    is_json && !is_meta && path.is_file()
}

fn read_string_file(path: &Path) -> anyhow::Result<StringTable> {
    let contents = fs::read_to_string(path)?;
    let strings: StringTable = serde_json::from_str(&contents)?;
    Ok(strings)
}
