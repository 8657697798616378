//! Persisted envelope `{ "state": ..., "version": n }`
//!
//! This is the unit a store framework writes to LocalStorage. Parsing is
//! explicit: a document either is an envelope or is a
//! [`PersistError::Envelope`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PersistError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Store state; anything JSON, normally an object
    #[serde(default)]
    pub state: Value,
    /// Schema version of `state`
    #[serde(default)]
    pub version: i64,
}

impl Envelope {
    pub fn new(state: Value, version: i64) -> Self {
        Self { state, version }
    }

    /// Parse the wire form. Malformed JSON or a non-object document fails.
    pub fn parse(raw: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(raw).map_err(PersistError::Envelope)?;
        if !doc.is_object() {
            let found = crate::codec::flatten::kind(&doc);
            return Err(PersistError::Envelope(
                <serde_json::Error as serde::de::Error>::custom(format!(
                    "expected an object, found {}",
                    found
                )),
            ));
        }
        serde_json::from_value(doc).map_err(PersistError::Envelope)
    }

    /// Envelope for state that only exists in the URL
    pub fn from_query_state(state: Map<String, Value>) -> Self {
        Self {
            state: Value::Object(state),
            version: 0,
        }
    }

    /// Shallow merge: top-level keys from `query` replace those in `state`.
    /// A non-object `state` is dropped first.
    pub fn merge_query_state(&mut self, query: Map<String, Value>) {
        if !self.state.is_object() {
            log::debug!("Envelope state is not an object, replacing with {{}}");
            self.state = Value::Object(Map::new());
        }
        if let Value::Object(state) = &mut self.state {
            state.extend(query);
        }
    }

    /// Serialize back to the wire form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_parse_full() {
        let env = Envelope::parse(r#"{"state":{"a":1},"version":3}"#).unwrap();
        assert_eq!(env.state, json!({"a": 1}));
        assert_eq!(env.version, 3);
    }

    #[test]
    fn test_parse_missing_fields_default() {
        let env = Envelope::parse("{}").unwrap();
        assert_eq!(env.state, Value::Null);
        assert_eq!(env.version, 0);
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            Envelope::parse("{not json"),
            Err(PersistError::Envelope(_))
        ));
        assert!(matches!(
            Envelope::parse("[1,2]"),
            Err(PersistError::Envelope(_))
        ));
        assert!(matches!(
            Envelope::parse(r#"{"state":{},"version":"one"}"#),
            Err(PersistError::Envelope(_))
        ));
    }

    #[test]
    fn test_merge_query_wins() {
        let mut env = Envelope::new(json!({"a": 1, "b": 2}), 1);
        env.merge_query_state(object(json!({"a": 9})));
        assert_eq!(env.state, json!({"a": 9, "b": 2}));
        assert_eq!(env.version, 1);
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut env = Envelope::new(json!({"filters": {"status": "open", "page": 2}}), 0);
        env.merge_query_state(object(json!({"filters": {"status": "closed"}})));
        assert_eq!(env.state, json!({"filters": {"status": "closed"}}));
    }

    #[test]
    fn test_merge_replaces_non_object_state() {
        let mut env = Envelope::new(json!("garbage"), 2);
        env.merge_query_state(object(json!({"a": "1"})));
        assert_eq!(env.state, json!({"a": "1"}));

        let mut env = Envelope::new(Value::Null, 0);
        env.merge_query_state(Map::new());
        assert_eq!(env.state, json!({}));
    }

    #[test]
    fn test_to_json_round_trip() {
        let env = Envelope::from_query_state(object(json!({"room": {"id": "r1"}})));
        let raw = env.to_json().unwrap();
        assert_eq!(raw, r#"{"state":{"room":{"id":"r1"}},"version":0}"#);
        assert_eq!(Envelope::parse(&raw).unwrap(), env);
    }
}
