use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::{KeyValueStorage, UrlParams};
use crate::codec::{decode_form_component, encode_form_component};
use crate::error::{PersistError, Result};

/// In-memory LocalStorage.
///
/// Uses `RefCell` since everything here runs on one thread.
#[derive(Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
    simulate_write_error: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation (quota exceeded, private mode)
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(PersistError::Storage("Simulated write error".to_string()));
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// In-memory page location with a history stack depth.
///
/// Parameters keep their order, like `URLSearchParams`. Only
/// [`MemoryLocation::navigate`] adds a history entry.
pub struct MemoryLocation {
    path: RefCell<String>,
    params: RefCell<Vec<(String, String)>>,
    /// `#...` including the hash, or empty
    fragment: RefCell<String>,
    history_len: Cell<usize>,
    simulate_write_error: Cell<bool>,
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::from_href("/")
    }
}

impl MemoryLocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at `path?query#fragment`, e.g. a shared deep link
    pub fn from_href(href: &str) -> Self {
        let (path, params, fragment) = split_href(href);
        Self {
            path: RefCell::new(path),
            params: RefCell::new(params),
            fragment: RefCell::new(fragment),
            history_len: Cell::new(1),
            simulate_write_error: Cell::new(false),
        }
    }

    /// Push a new history entry, as a user following a link would
    pub fn navigate(&self, href: &str) {
        let (path, params, fragment) = split_href(href);
        *self.path.borrow_mut() = path;
        *self.params.borrow_mut() = params;
        *self.fragment.borrow_mut() = fragment;
        self.history_len.set(self.history_len.get() + 1);
    }

    /// Current URL, path plus form-encoded query plus fragment
    pub fn href(&self) -> String {
        let path = self.path.borrow();
        let params = self.params.borrow();
        let fragment = self.fragment.borrow();
        if params.is_empty() {
            return format!("{}{}", path, fragment);
        }
        let query = params
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    encode_form_component(name),
                    encode_form_component(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}{}", path, query, fragment)
    }

    pub fn history_len(&self) -> usize {
        self.history_len.get()
    }

    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(PersistError::Url("Simulated history error".to_string()));
        }
        Ok(())
    }
}

/// Split into path, decoded params and `#fragment` (hash kept)
fn split_href(href: &str) -> (String, Vec<(String, String)>, String) {
    let (href, fragment) = match href.find('#') {
        Some(hash) => href.split_at(hash),
        None => (href, ""),
    };
    let (path, query) = href.split_once('?').unwrap_or((href, ""));
    let params = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_form_component(name), decode_form_component(value))
        })
        .collect();
    (path.to_string(), params, fragment.to_string())
}

impl UrlParams for MemoryLocation {
    fn get_param(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .params
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.clone()))
    }

    fn replace_param(&self, name: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        let mut params = self.params.borrow_mut();
        match params.iter().position(|(n, _)| n == name) {
            Some(first) => {
                params[first].1 = value.to_string();
                let mut index = 0;
                params.retain(|(n, _)| {
                    let keep = index <= first || n != name;
                    index += 1;
                    keep
                });
            }
            None => params.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn remove_param(&self, name: &str) -> Result<()> {
        self.check_writable()?;
        self.params.borrow_mut().retain(|(n, _)| n != name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
        storage.remove_item("k").unwrap();
        storage.remove_item("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_storage_simulated_error() {
        let storage = MemoryStorage::new();
        storage.set_simulate_write_error(true);
        assert!(matches!(
            storage.set_item("k", "v"),
            Err(PersistError::Storage(_))
        ));
        assert_eq!(storage.len(), 0);
    }

    #[test]
    fn test_location_parses_href() {
        let location = MemoryLocation::from_href("/orders?tab=open&q=a+b%26c");
        assert_eq!(location.get_param("tab").unwrap().as_deref(), Some("open"));
        assert_eq!(location.get_param("q").unwrap().as_deref(), Some("a b&c"));
        assert_eq!(location.get_param("missing").unwrap(), None);
        assert_eq!(location.href(), "/orders?tab=open&q=a+b%26c");
    }

    #[test]
    fn test_location_keeps_fragment_out_of_params() {
        let location = MemoryLocation::from_href("/orders?tab=open&s=a%3D1#details");
        assert_eq!(location.get_param("s").unwrap().as_deref(), Some("a=1"));
        location.replace_param("tab", "closed").unwrap();
        assert_eq!(location.href(), "/orders?tab=closed&s=a%3D1#details");

        location.remove_param("tab").unwrap();
        location.remove_param("s").unwrap();
        assert_eq!(location.href(), "/orders#details");

        let location = MemoryLocation::from_href("/map#?driver=7");
        assert_eq!(location.get_param("driver").unwrap(), None);
        assert_eq!(location.href(), "/map#?driver=7");
    }

    #[test]
    fn test_location_replace_keeps_position_and_dedupes() {
        let location = MemoryLocation::from_href("/?a=1&b=2&a=3&c=4");
        location.replace_param("a", "x").unwrap();
        assert_eq!(location.href(), "/?a=x&b=2&c=4");
        location.replace_param("d", "y z").unwrap();
        assert_eq!(location.href(), "/?a=x&b=2&c=4&d=y+z");
        assert_eq!(location.history_len(), 1);
    }

    #[test]
    fn test_location_remove() {
        let location = MemoryLocation::from_href("/list?a=1&b=2");
        location.remove_param("a").unwrap();
        location.remove_param("nope").unwrap();
        assert_eq!(location.href(), "/list?b=2");
        location.remove_param("b").unwrap();
        assert_eq!(location.href(), "/list");
    }

    #[test]
    fn test_navigate_pushes_history() {
        let location = MemoryLocation::new();
        location.navigate("/map?driver=7");
        assert_eq!(location.history_len(), 2);
        assert_eq!(location.get_param("driver").unwrap().as_deref(), Some("7"));
    }

    #[test]
    fn test_location_simulated_error() {
        let location = MemoryLocation::from_href("/?a=1");
        location.set_simulate_write_error(true);
        assert!(location.replace_param("a", "2").is_err());
        assert!(location.remove_param("a").is_err());
        assert_eq!(location.href(), "/?a=1");
    }
}
