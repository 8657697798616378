//! Restore leaf types lost in the query-string round trip
//!
//! The URL only carries strings. The caller knows what its state looks like,
//! so it hands over a template (usually its default state) and string leaves
//! are parsed into whatever type the template has at the same path.

use serde_json::{Number, Value};

/// Coerce string leaves of `value` to the types found in `template`.
///
/// Strings that don't parse as the template's type are kept, as are keys
/// the template doesn't know about.
pub fn coerce_like(template: &Value, value: Value) -> Value {
    match (template, value) {
        (Value::Object(shape), Value::Object(map)) => Value::Object(
            map.into_iter()
                .map(|(key, child)| {
                    let child = match shape.get(&key) {
                        Some(field) => coerce_like(field, child),
                        None => child,
                    };
                    (key, child)
                })
                .collect(),
        ),
        (Value::Array(shape), Value::Array(items)) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match shape.get(index).or(shape.first()) {
                    Some(element) => coerce_like(element, item),
                    None => item,
                })
                .collect(),
        ),
        (Value::Number(_), Value::String(s)) => parse_number(&s).unwrap_or(Value::String(s)),
        (Value::Bool(_), Value::String(s)) => match s.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(s),
        },
        (Value::Null, Value::String(s)) if s == "null" => Value::Null,
        (Value::Object(_), Value::String(s)) if s == "{}" => Value::Object(Default::default()),
        (Value::Array(_), Value::String(s)) if s == "[]" => Value::Array(Vec::new()),
        (_, value) => value,
    }
}

fn parse_number(s: &str) -> Option<Value> {
    if let Ok(n) = s.parse::<i64>() {
        return Some(Value::from(n));
    }
    if let Ok(n) = s.parse::<u64>() {
        return Some(Value::from(n));
    }
    s.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}
