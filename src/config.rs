use crate::error::{I18nError, Result as I18nResult};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Supported-languages entry meaning "every locale directory on disk".
pub const WILDCARD: &str = "*";

pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Localization settings, consumed once when building the translation store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Language tags to serve, or `["*"]` to discover them from directories
    pub supported_languages: Vec<String>,

    /// Fallback language; must be one of the supported languages
    pub default_language: String,

    /// Root holding one directory of JSON string files per locale
    pub translation_directory: PathBuf,

    /// Alias tag -> canonical tag (e.g., "en" -> "en-CA")
    pub mappings: BTreeMap<String, String>,

    /// Log skipped alias mappings at warn level
    pub warnings: bool,

    /// Name to bind the formatter under when "format" is already taken
    pub format_fn_name: Option<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            supported_languages: Vec::new(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            translation_directory: PathBuf::new(),
            mappings: BTreeMap::new(),
            warnings: false,
            format_fn_name: None,
        }
    }
}

impl I18nConfig {
    pub fn new(
        supported_languages: impl IntoIterator<Item = impl Into<String>>,
        translation_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            supported_languages: supported_languages.into_iter().map(Into::into).collect(),
            translation_directory: translation_directory.into(),
            ..Self::default()
        }
    }

    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    pub fn with_mapping(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.mappings.insert(alias.into(), canonical.into());
        self
    }

    pub fn with_warnings(mut self, warnings: bool) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn with_format_fn_name(mut self, name: impl Into<String>) -> Self {
        self.format_fn_name = Some(name.into());
        self
    }

    /// Whether the supported languages come from a directory scan.
    pub fn is_wildcard(&self) -> bool {
        self.supported_languages.len() == 1 && self.supported_languages[0] == WILDCARD
    }

    /// Check required keys and the wildcard rule.
    ///
    /// Whether the default language is supported can only be checked once
    /// a wildcard has been expanded, so that happens in the store.
    pub fn validate(&self) -> I18nResult<()> {
        if self.translation_directory.as_os_str().is_empty() {
            return Err(I18nError::Config(
                "no translation_directory specified".to_string(),
            ));
        }
        if self.supported_languages.is_empty() {
            return Err(I18nError::Config(
                "no supported_languages specified".to_string(),
            ));
        }
        if !self.is_wildcard() && self.supported_languages.iter().any(|l| l == WILDCARD) {
            return Err(I18nError::Config(
                "'*' cannot be combined with other supported_languages".to_string(),
            ));
        }
        Ok(())
    }
}

/// Process configuration for the demo server.
#[derive(Debug, Clone)]
pub struct Config {
    pub i18n: I18nConfig,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let supported_languages = std::env::var("I18N_SUPPORTED_LANGUAGES")
            .context("I18N_SUPPORTED_LANGUAGES not set")?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let mappings = std::env::var("I18N_MAPPINGS")
            .map(|v| parse_mappings(&v))
            .unwrap_or_default();

        Ok(Self {
            i18n: I18nConfig {
                supported_languages,
                default_language: std::env::var("I18N_DEFAULT_LANGUAGE")
                    .unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string()),
                translation_directory: std::env::var("I18N_TRANSLATION_DIRECTORY")
                    .context("I18N_TRANSLATION_DIRECTORY not set")?
                    .into(),
                mappings,
                warnings: std::env::var("I18N_WARNINGS")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(false),
                format_fn_name: std::env::var("I18N_FORMAT_FN_NAME").ok(),
            },
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
        })
    }
}

/// Parse `alias=canonical` pairs separated by commas.
fn parse_mappings(value: &str) -> BTreeMap<String, String> {
    value
        .split(',')
        .filter_map(|pair| {
            let (alias, canonical) = pair.split_once('=')?;
            let (alias, canonical) = (alias.trim(), canonical.trim());
            if alias.is_empty() || canonical.is_empty() {
                return None;
            }
            Some((alias.to_string(), canonical.to_string()))
        })
        .collect()
}
