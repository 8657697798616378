//! JS-facing storage object (wasm32 only)
//!
//! Plugs into a JS store framework as its synchronous storage:
//!
//! ```js
//! import init, { QueryStorage } from "query-persist";
//! await init();
//! persist(store, { name: "chat-store", storage: createJSONStorage(() => new QueryStorage()) });
//! ```
//!
//! Errors never cross into JS from the three storage calls; they are
//! logged and the call degrades to "no value" or a no-op.

use wasm_bindgen::prelude::*;

use crate::adapter::PersistStorage;
use crate::backend::{WebLocation, WebStorage};
use crate::config::CodecConfig;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second module instance would fail here; the first logger stays
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("query-persist ready");
}

#[wasm_bindgen]
pub struct QueryStorage {
    inner: PersistStorage<WebStorage, WebLocation>,
}

#[wasm_bindgen]
impl QueryStorage {
    /// `config` is optional JSON, e.g. `{"on_malformed":"fail"}`
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<QueryStorage, JsValue> {
        let config = match config {
            Some(json) => {
                CodecConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => CodecConfig::default(),
        };
        let storage =
            WebStorage::local().ok_or_else(|| JsValue::from_str("localStorage unavailable"))?;
        let location =
            WebLocation::current().ok_or_else(|| JsValue::from_str("no window location"))?;
        Ok(Self {
            inner: PersistStorage::with_config(storage, location, config),
        })
    }

    #[wasm_bindgen(js_name = getItem)]
    pub fn get_item(&self, name: &str) -> Option<String> {
        match self.inner.get_item(name) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("getItem({:?}) failed: {}", name, e);
                None
            }
        }
    }

    #[wasm_bindgen(js_name = setItem)]
    pub fn set_item(&self, name: &str, value: &str) {
        if let Err(e) = self.inner.set_item(name, value) {
            log::warn!("setItem({:?}) failed: {}", name, e);
        }
    }

    #[wasm_bindgen(js_name = removeItem)]
    pub fn remove_item(&self, name: &str) {
        if let Err(e) = self.inner.remove_item(name) {
            log::warn!("removeItem({:?}) failed: {}", name, e);
        }
    }
}
