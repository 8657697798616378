//! Browser backends (wasm32 only)

use wasm_bindgen::JsValue;
use web_sys::{Storage, Url, Window};

use super::{KeyValueStorage, UrlParams};
use crate::error::{PersistError, Result};

fn storage_err(err: JsValue) -> PersistError {
    PersistError::Storage(format!("{:?}", err))
}

fn url_err(err: JsValue) -> PersistError {
    PersistError::Url(format!("{:?}", err))
}

/// `window.localStorage`
pub struct WebStorage {
    storage: Storage,
}

impl WebStorage {
    /// None when there is no window or storage is disabled
    pub fn local() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl KeyValueStorage for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(storage_err)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(storage_err)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(storage_err)
    }
}

/// `window.location` read, `history.replaceState` write
pub struct WebLocation {
    window: Window,
}

impl WebLocation {
    pub fn current() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }

    fn url(&self) -> Result<Url> {
        let href = self.window.location().href().map_err(url_err)?;
        Url::new(&href).map_err(url_err)
    }

    /// Swap the current history entry for `url`, keeping `history.state`
    fn replace(&self, url: &Url) -> Result<()> {
        let history = self.window.history().map_err(url_err)?;
        let state = history.state().unwrap_or(JsValue::NULL);
        history
            .replace_state_with_url(&state, "", Some(&url.href()))
            .map_err(url_err)
    }
}

impl UrlParams for WebLocation {
    fn get_param(&self, name: &str) -> Result<Option<String>> {
        Ok(self.url()?.search_params().get(name))
    }

    fn replace_param(&self, name: &str, value: &str) -> Result<()> {
        let url = self.url()?;
        url.search_params().set(name, value);
        self.replace(&url)
    }

    fn remove_param(&self, name: &str) -> Result<()> {
        let url = self.url()?;
        url.search_params().delete(name);
        self.replace(&url)
    }
}
