//! Side-effecting collaborators of the storage adapter
//!
//! The adapter never touches the browser directly. It goes through two
//! small traits so the same read/write logic runs against:
//! - `memory`: in-process maps (tests, native CLI)
//! - `web`: `window.localStorage` and `window.location`/`history` (wasm32)

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use memory::{MemoryLocation, MemoryStorage};
#[cfg(target_arch = "wasm32")]
pub use web::{WebLocation, WebStorage};

use crate::error::Result;

/// Durable string key/value storage (LocalStorage semantics).
/// All methods take `&self`; implementations use interior mutability.
pub trait KeyValueStorage {
    /// Returns Ok(None) when the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Query parameters of the current page URL.
///
/// Values cross this boundary URL-decoded. Writes edit the current history
/// entry in place and never navigate.
pub trait UrlParams {
    fn get_param(&self, name: &str) -> Result<Option<String>>;

    /// Set `name` to `value`, replacing any existing occurrences
    fn replace_param(&self, name: &str, value: &str) -> Result<()>;

    /// Removing an absent parameter is not an error.
    fn remove_param(&self, name: &str) -> Result<()>;
}
