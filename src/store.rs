//! Typed view of one persisted store
//!
//! Wraps the string-level adapter for Rust callers: state goes in and comes
//! out as `T`, URL strings are revived against `T::default()`, and anything
//! unreadable falls back to the default.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::adapter::PersistStorage;
use crate::backend::{KeyValueStorage, UrlParams};
use crate::codec::coerce_like;
use crate::envelope::Envelope;
use crate::error::Result;

/// Upgrade state persisted under an older version
pub type Migrate = Box<dyn Fn(Value, i64) -> Result<Value>>;

pub struct PersistedStore<T> {
    name: String,
    version: i64,
    migrate: Option<Migrate>,
    _state: PhantomData<T>,
}

impl<T> PersistedStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(name: impl Into<String>, version: i64) -> Self {
        Self {
            name: name.into(),
            version,
            migrate: None,
            _state: PhantomData,
        }
    }

    pub fn with_migrate(mut self, migrate: impl Fn(Value, i64) -> Result<Value> + 'static) -> Self {
        self.migrate = Some(Box::new(migrate));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    /// Hydrate, falling back to `T::default()` on any problem
    pub fn load<S: KeyValueStorage, U: UrlParams>(&self, adapter: &PersistStorage<S, U>) -> T {
        match self.try_load(adapter) {
            Ok(Some(state)) => {
                log::info!("Loaded store {:?}", self.name);
                state
            }
            Ok(None) => {
                log::info!("Using default state for {:?}", self.name);
                T::default()
            }
            Err(e) => {
                log::warn!("Could not load store {:?}, using defaults: {}", self.name, e);
                T::default()
            }
        }
    }

    /// Hydrate; Ok(None) means nothing usable was persisted.
    ///
    /// Version 0 is what a URL-only envelope carries, so it is read as-is
    /// regardless of the store version.
    pub fn try_load<S: KeyValueStorage, U: UrlParams>(
        &self,
        adapter: &PersistStorage<S, U>,
    ) -> Result<Option<T>> {
        let Some(raw) = adapter.get_item(&self.name)? else {
            return Ok(None);
        };
        let envelope = Envelope::parse(&raw)?;

        let state = if envelope.version == self.version || envelope.version == 0 {
            envelope.state
        } else if let Some(migrate) = &self.migrate {
            log::info!(
                "Migrating {:?} from version {} to {}",
                self.name,
                envelope.version,
                self.version
            );
            migrate(envelope.state, envelope.version)?
        } else {
            log::warn!(
                "Store {:?} persisted at version {}, expected {}; ignoring",
                self.name,
                envelope.version,
                self.version
            );
            return Ok(None);
        };

        // The durable record knows the types of fields whose default is null
        let durable = adapter
            .storage()
            .get_item(&self.name)
            .ok()
            .flatten()
            .and_then(|raw| Envelope::parse(&raw).ok())
            .map(|envelope| envelope.state)
            .unwrap_or(Value::Null);
        let defaults = serde_json::to_value(T::default())?;
        let revived = coerce_like(&defaults, coerce_like(&durable, state));
        Ok(Some(serde_json::from_value(overlay(defaults, revived))?))
    }

    pub fn save<S: KeyValueStorage, U: UrlParams>(
        &self,
        adapter: &PersistStorage<S, U>,
        state: &T,
    ) -> Result<()> {
        let envelope = Envelope::new(serde_json::to_value(state)?, self.version);
        adapter.set_item(&self.name, &envelope.to_json()?)
    }

    pub fn clear<S: KeyValueStorage, U: UrlParams>(
        &self,
        adapter: &PersistStorage<S, U>,
    ) -> Result<()> {
        adapter.remove_item(&self.name)
    }
}

/// Deep-merge `top` onto `base`; objects merge, anything else replaces
fn overlay(base: Value, top: Value) -> Value {
    match (base, top) {
        (Value::Object(mut base), Value::Object(top)) => {
            for (key, value) in top {
                let merged = match base.remove(&key) {
                    Some(existing) => overlay(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, top) => top,
    }
}
