//! Path-join transform between nested state and a flat key/value map
//!
//! `{"room": {"id": "r1", "tags": ["a"]}}` flattens to
//! `room.id = "r1"`, `room.tags.0 = "a"`. Arrays are indexed objects on the
//! way down and are rebuilt from dense `0..n` keys on the way up. Empty
//! containers are kept as leaves so nothing disappears.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{PersistError, Result};

/// Default separator between path segments
pub const DEFAULT_DELIMITER: &str = ".";

/// Single-level map from joined paths to leaf values
pub type FlatMap = BTreeMap<String, Value>;

/// Flatten a state object using [`DEFAULT_DELIMITER`]
pub fn flatten(obj: &Value) -> Result<FlatMap> {
    flatten_with(obj, DEFAULT_DELIMITER)
}

/// Flatten a state object, joining path segments with `delimiter`.
///
/// Fails if the root is not an object, if an object key contains the
/// delimiter, or if two distinct paths join to the same flat key.
pub fn flatten_with(obj: &Value, delimiter: &str) -> Result<FlatMap> {
    let Value::Object(map) = obj else {
        return Err(PersistError::RootNotObject(kind(obj)));
    };

    let mut flat = FlatMap::new();
    for (key, value) in map {
        check_key(key, delimiter)?;
        walk(value, key.clone(), delimiter, &mut flat)?;
    }
    Ok(flat)
}

fn walk(value: &Value, path: String, delimiter: &str, flat: &mut FlatMap) -> Result<()> {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                check_key(key, delimiter)?;
                walk(child, format!("{path}{delimiter}{key}"), delimiter, flat)?;
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                walk(child, format!("{path}{delimiter}{index}"), delimiter, flat)?;
            }
        }
        leaf => {
            // Reachable with multi-character delimiters ("a:" + "::" + ":b")
            if flat.contains_key(&path) {
                return Err(PersistError::DuplicateKey(path));
            }
            flat.insert(path, leaf.clone());
        }
    }
    Ok(())
}

fn check_key(key: &str, delimiter: &str) -> Result<()> {
    if key.contains(delimiter) {
        return Err(PersistError::DelimiterInKey {
            key: key.to_string(),
            delimiter: delimiter.to_string(),
        });
    }
    Ok(())
}

/// Unflatten using [`DEFAULT_DELIMITER`]
pub fn unflatten(flat: &FlatMap) -> Result<Value> {
    unflatten_with(flat, DEFAULT_DELIMITER)
}

/// Rebuild nested state from a flat map.
///
/// A key that is also the prefix of a longer key is a
/// [`PersistError::PathConflict`], even when its value is an object.
/// Nested objects whose keys are exactly `"0".."n-1"` come back as arrays;
/// the root is always an object.
pub fn unflatten_with(flat: &FlatMap, delimiter: &str) -> Result<Value> {
    let mut root = Map::new();

    for (key, value) in flat {
        let segments: Vec<&str> = key.split(delimiter).collect();
        let Some((last, parents)) = segments.split_last() else {
            continue;
        };

        let mut node = &mut root;
        for (depth, segment) in parents.iter().enumerate() {
            // Any prefix that is itself a flat key was assigned as a leaf,
            // whatever its value; walking into it would merge two paths
            let prefix = segments[..=depth].join(delimiter);
            if flat.contains_key(&prefix) {
                return Err(PersistError::PathConflict(prefix));
            }
            let entry = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            node = match entry {
                Value::Object(child) => child,
                _ => {
                    return Err(PersistError::PathConflict(
                        segments[..=depth].join(delimiter),
                    ));
                }
            };
        }

        if node.contains_key(*last) {
            return Err(PersistError::PathConflict(key.clone()));
        }
        node.insert(last.to_string(), value.clone());
    }

    // The root stays an object even when its keys are "0".."n-1"
    Ok(Value::Object(
        root.into_iter()
            .map(|(key, child)| (key, densify(child)))
            .collect(),
    ))
}

/// Turn `{"0": a, "1": b}` into `[a, b]`, recursively
fn densify(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let is_dense = !map.is_empty()
                && (0..map.len()).all(|index| map.contains_key(&index.to_string()));
            if is_dense {
                let mut map = map;
                let items = (0..map.len())
                    .filter_map(|index| map.remove(&index.to_string()))
                    .map(densify)
                    .collect();
                Value::Array(items)
            } else {
                Value::Object(
                    map.into_iter()
                        .map(|(key, child)| (key, densify(child)))
                        .collect(),
                )
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(densify).collect()),
        leaf => leaf,
    }
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
