//! `%s` / `%(name)s` string interpolation.

use crate::error::FormatError;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static NAMED_REGEX: OnceLock<Regex> = OnceLock::new();

/// Interpolate `data` into `fmt`.
///
/// An array (or `named == Some(false)`) fills `%s` placeholders left to
/// right. An object (or `named == Some(true)`) fills `%(name)s` placeholders
/// by key. Any other data leaves `fmt` untouched.
///
/// Running out of positional values, or naming a key that is absent, is an
/// error. Placeholder counts are not checked up front.
///
/// ```ignore
/// format("%(a)s %(b)s", &json!({"a": "Hello", "b": "World"}), None)?; // "Hello World"
/// format("%s %s", &json!(["Hello", "World"]), None)?;                 // "Hello World"
/// ```
pub fn format(fmt: &str, data: &Value, named: Option<bool>) -> Result<String, FormatError> {
    if fmt.is_empty() {
        return Ok(String::new());
    }

    match (data, named) {
        (Value::Array(values), _) => format_positional(fmt, values),
        (_, Some(false)) => format_positional(fmt, &[]),
        (Value::Object(_), _) | (_, Some(true)) => format_named(fmt, data),
        _ => Ok(fmt.to_string()),
    }
}

fn format_positional(fmt: &str, values: &[Value]) -> Result<String, FormatError> {
    let mut values = values.iter();
    let mut output = String::with_capacity(fmt.len());

    for (index, piece) in fmt.split("%s").enumerate() {
        if index > 0 {
            let value = values.next().ok_or(FormatError::MissingPositional {
                index: index - 1,
            })?;
            output.push_str(&display(value));
        }
        output.push_str(piece);
    }

    Ok(output)
}

fn format_named(fmt: &str, data: &Value) -> Result<String, FormatError> {
    let regex = NAMED_REGEX.get_or_init(|| Regex::new(r"%\(\s*([^)]+)\s*\)s").unwrap());

    let mut output = String::with_capacity(fmt.len());
    let mut last = 0;
    for captures in regex.captures_iter(fmt) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let name = name.as_str().trim();
        let value = data.get(name).ok_or_else(|| FormatError::MissingNamed {
            name: name.to_string(),
        })?;
        output.push_str(&fmt[last..whole.start()]);
        output.push_str(&display(value));
        last = whole.end();
    }
    output.push_str(&fmt[last..]);

    Ok(output)
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
