//! Placeholder expansion for server-supplied error messages.
//!
//! Error payloads carry a `result` template such as `"Not found: %1"` or
//! `"Missing %name"` together with `parameters`, either a positional array or
//! a keyed object.

use serde_json::Value;

/// Expands `%N` / `%name` placeholders in `template` from `parameters`.
///
/// | `parameters` | behavior                                                   |
/// |--------------|------------------------------------------------------------|
/// | `null`       | template returned as-is                                    |
/// | array        | element `i` replaces the first `%{i+1}` still present      |
/// | object       | value for `k` replaces the first `%k`, in payload key order |
/// | anything else| template returned as-is                                    |
///
/// Each placeholder is substituted at most once; unmatched placeholders are
/// left verbatim.
pub fn expand(template: &str, parameters: &Value) -> String {
    match parameters {
        Value::Array(values) => {
            values
                .iter()
                .enumerate()
                .fold(template.to_string(), |message, (i, value)| {
                    message.replacen(&format!("%{}", i + 1), &display_value(value), 1)
                })
        }
        Value::Object(map) => map
            .iter()
            .fold(template.to_string(), |message, (key, value)| {
                message.replacen(&format!("%{key}"), &display_value(value), 1)
            }),
        _ => template.to_string(),
    }
}

/// Renders a JSON value the way it should read inside a message: strings
/// without quotes, everything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
