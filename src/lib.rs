//! Query Persist - store state mirrored into LocalStorage and the URL
//!
//! Core modules:
//! - `codec`: Pure flatten/unflatten, query-string and type-revival transforms
//! - `envelope`: The `{ state, version }` record a store persists
//! - `backend`: LocalStorage / URL abstraction (memory and browser)
//! - `adapter`: `getItem` / `setItem` / `removeItem` over both sources
//! - `store`: Typed load/save on top of the adapter

pub mod adapter;
#[cfg(target_arch = "wasm32")]
pub mod bindings;
pub mod backend;
pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
pub mod store;

pub use adapter::PersistStorage;
pub use backend::{KeyValueStorage, MemoryLocation, MemoryStorage, UrlParams};
pub use codec::{FlatMap, flatten, from_query_string, to_query_string, unflatten};
pub use config::{CodecConfig, MalformedPolicy};
pub use envelope::Envelope;
pub use error::{PersistError, Result};
pub use store::PersistedStore;
