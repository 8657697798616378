//! Storage adapter: one store name, two places
//!
//! Each store is persisted twice under the same name:
//! - LocalStorage holds the raw envelope JSON (the durable record)
//! - the URL parameter holds the flattened state (the shareable view)
//!
//! Reads merge the two with the URL winning at the top level. Writes fan
//! out to both. There is no transaction; if one side fails the two drift
//! until the next successful write.

use serde_json::{Map, Value};

use crate::backend::{KeyValueStorage, UrlParams};
use crate::codec::{flatten_with, from_query_string, to_query_string, unflatten_with};
use crate::config::{CodecConfig, MalformedPolicy};
use crate::envelope::Envelope;
use crate::error::{PersistError, Result};

pub struct PersistStorage<S, U> {
    storage: S,
    location: U,
    config: CodecConfig,
}

impl<S: KeyValueStorage, U: UrlParams> PersistStorage<S, U> {
    pub fn new(storage: S, location: U) -> Self {
        Self::with_config(storage, location, CodecConfig::default())
    }

    pub fn with_config(storage: S, location: U, config: CodecConfig) -> Self {
        Self {
            storage,
            location,
            config,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn location(&self) -> &U {
        &self.location
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Read the merged envelope for `key` as JSON.
    ///
    /// Returns Ok(None) when neither LocalStorage nor the URL has anything,
    /// which tells the store to use its defaults.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let stored = self.read_storage(key)?;
        let query = self.read_query(key)?;

        let envelope = match (stored, query) {
            (None, None) => {
                log::debug!("No persisted value for {:?}", key);
                return Ok(None);
            }
            (None, Some(query)) => Envelope::from_query_state(query),
            (Some(mut envelope), query) => {
                envelope.merge_query_state(query.unwrap_or_default());
                envelope
            }
        };

        envelope.to_json().map(Some)
    }

    /// Write `value` (envelope JSON) to LocalStorage and mirror its state
    /// into the URL parameter `key`.
    ///
    /// The LocalStorage write happens even if the URL half fails; the first
    /// error is returned.
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let url_result = self.write_query(key, value);
        if let Err(e) = &url_result {
            log::warn!("Could not mirror {:?} into the URL: {}", key, e);
        }

        let storage_result = self.storage.set_item(key, value);
        if let Err(e) = &storage_result {
            log::warn!("Could not write {:?} to storage: {}", key, e);
        }

        url_result.and(storage_result)
    }

    /// Delete the LocalStorage entry and the URL parameter for `key`
    pub fn remove_item(&self, key: &str) -> Result<()> {
        let storage_result = self.storage.remove_item(key);
        let url_result = self.location.remove_param(key);
        log::debug!("Removed persisted value for {:?}", key);
        storage_result.and(url_result)
    }

    fn write_query(&self, key: &str, value: &str) -> Result<()> {
        let envelope = Envelope::parse(value)?;

        let mut mirrored = Map::new();
        mirrored.insert(self.config.envelope_field.clone(), envelope.state);
        let flat = flatten_with(&Value::Object(mirrored), &self.config.delimiter)?;
        let qs = to_query_string(&flat);

        log::debug!("Mirroring {:?} into the URL ({} fields)", key, flat.len());
        self.location.replace_param(key, &qs)
    }

    fn read_storage(&self, key: &str) -> Result<Option<Envelope>> {
        let Some(raw) = self.storage.get_item(key)? else {
            return Ok(None);
        };
        match Envelope::parse(&raw) {
            Ok(envelope) => Ok(Some(envelope)),
            Err(e) => self.malformed(key, "storage", e),
        }
    }

    /// State carried by the URL parameter; None when absent or empty
    fn read_query(&self, key: &str) -> Result<Option<Map<String, Value>>> {
        let Some(qs) = self.location.get_param(key)? else {
            return Ok(None);
        };

        let flat = from_query_string(&qs);
        let tree = match unflatten_with(&flat, &self.config.delimiter) {
            Ok(tree) => tree,
            Err(e) => return self.malformed(key, "URL", e),
        };

        let state = match tree {
            Value::Object(mut root) => match root.remove(&self.config.envelope_field) {
                Some(Value::Object(state)) => state,
                _ => Map::new(),
            },
            _ => Map::new(),
        };
        // A parameter with nothing under the envelope field carries no data
        if state.is_empty() {
            log::debug!("URL parameter {:?} holds no state", key);
            return Ok(None);
        }
        Ok(Some(state))
    }

    fn malformed<T>(&self, key: &str, source: &str, err: PersistError) -> Result<Option<T>> {
        match self.config.on_malformed {
            MalformedPolicy::TreatAsAbsent => {
                log::warn!("Ignoring malformed {} value for {:?}: {}", source, key, err);
                Ok(None)
            }
            MalformedPolicy::Fail => Err(err),
        }
    }
}
