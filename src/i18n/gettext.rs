//! String lookup with default-locale fallback.
//!
//! Entries come in two shapes: a bare string, or a record carrying the text
//! under `message`. Lookups run in lenient mode by default, where empty
//! entries count as untranslated and a missing key yields the key itself.
//! Strict mode returns an empty string for a missing key and only unwraps a
//! record whose `message` is a string.

use serde::Deserialize;
use serde_json::Value;

/// Per-lookup behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct LookupOptions {
    pub strict: bool,
}

impl LookupOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Resolve a key from the requested locale's entry and the default locale's.
///
/// A falsy localized entry falls through to the default entry. A record
/// entry is unwrapped to its `message` when accepted by the mode (truthy in
/// lenient mode, a string in strict mode), otherwise returned whole.
pub fn resolve(
    key: &str,
    localized: Option<&Value>,
    fallback: Option<&Value>,
    options: LookupOptions,
) -> Value {
    let entry = localized.filter(|value| is_truthy(value)).or(fallback);

    match entry {
        Some(entry) if is_truthy(entry) => {
            let message = entry.get("message");
            let accepted = if options.strict {
                matches!(message, Some(Value::String(_)))
            } else {
                message.is_some_and(is_truthy)
            };
            match message {
                Some(message) if accepted => message.clone(),
                _ => entry.clone(),
            }
        }
        _ if options.strict => Value::String(String::new()),
        _ => Value::String(key.to_string()),
    }
}

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a resolved value as display text.
pub fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
