//! Query-string codec for flat maps
//!
//! Keys and values are escaped with the `encodeURIComponent` alphabet, so
//! `&`, `=` and `%` inside either side survive the trip. Values come back as
//! strings; see [`crate::codec::revive`] for getting types back.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde_json::Value;

use super::flatten::FlatMap;

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `application/x-www-form-urlencoded` keeps only `* - . _` unescaped
const FORM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Percent-encode one key or value
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

/// Form-encode one URL parameter name or value, spaces as `+`
pub fn encode_form_component(raw: &str) -> String {
    // A literal '%' is escaped to %25, so every %20 left here was a space
    utf8_percent_encode(raw, FORM)
        .to_string()
        .replace("%20", "+")
}

/// Percent-decode one key or value.
///
/// Broken escapes are kept literally and invalid UTF-8 is replaced, so this
/// never fails. `+` is left alone.
pub fn decode_component(encoded: &str) -> String {
    percent_decode_str(encoded).decode_utf8_lossy().into_owned()
}

/// Like [`decode_component`] but `+` means space, as in form-encoded URLs
pub fn decode_form_component(encoded: &str) -> String {
    decode_component(&encoded.replace('+', " "))
}

/// String form of a leaf: strings as-is, everything else as compact JSON
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Encode a flat map as `key=value&key=value`
pub fn to_query_string(flat: &FlatMap) -> String {
    flat.iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                encode_component(key),
                encode_component(&value_to_string(value))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode a query string into a flat map of string values.
///
/// A leading `?` is ignored, empty segments are skipped, a pair without `=`
/// gets an empty value and the last duplicate key wins.
pub fn from_query_string(qs: &str) -> FlatMap {
    let qs = qs.strip_prefix('?').unwrap_or(qs);
    let mut flat = FlatMap::new();
    if qs.is_empty() {
        return flat;
    }

    for pair in qs.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        flat.insert(
            decode_component(key),
            Value::String(decode_component(value)),
        );
    }
    flat
}
