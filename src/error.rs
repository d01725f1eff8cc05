use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring or using the localization layer.
#[derive(Debug, Error)]
pub enum I18nError {
    /// Invalid or incomplete configuration. Always fatal.
    #[error("Bad config - {0}")]
    Config(String),

    /// The default locale's string files could not be loaded.
    #[error("Default locale [{locale}] could not be loaded from [{}]: {source}", .path.display())]
    DefaultLocale {
        locale: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on [{}]: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Interpolation failures from [`crate::i18n::format`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("not enough values for positional placeholder #{index}")]
    MissingPositional { index: usize },

    #[error("no value named '{name}'")]
    MissingNamed { name: String },
}

pub type Result<T> = std::result::Result<T, I18nError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = I18nError::Config("override format_fn_name".to_string());
        assert_eq!(err.to_string(), "Bad config - override format_fn_name");
    }

    #[test]
    fn test_format_error_converts() {
        let err: I18nError = FormatError::MissingPositional { index: 2 }.into();
        assert!(matches!(err, I18nError::Format(_)));
        assert!(err.to_string().contains("#2"));
    }

    #[test]
    fn test_default_locale_error_mentions_path() {
        let err = I18nError::DefaultLocale {
            locale: "en_US".to_string(),
            path: PathBuf::from("/tmp/locale/en_US"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("en_US"));
        assert!(msg.contains("/tmp/locale/en_US"));
    }
}
