//! Server-side internationalization for axum applications.
//!
//! Negotiates the visitor's language from the URL and Accept-Language
//! header, serves per-locale string tables, and exposes `gettext` and
//! `format` helpers to request handlers.

pub mod config;
pub mod error;
pub mod i18n;
pub mod server;

pub use error::{FormatError, I18nError, Result};
