use storefront_core::cart::{CartStorage, StorageError};
use wasm_bindgen::{JsCast, JsValue};

/// `window.localStorage` as a cart slot store.
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    /// `None` when there is no window or the browser has storage disabled.
    pub fn open() -> Option<Self> {
        let inner = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { inner })
    }
}

impl CartStorage for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key).map_err(storage_error)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_item(key, value).map_err(storage_error)
    }
}

fn storage_error(err: JsValue) -> StorageError {
    if let Some(dom) = err.dyn_ref::<web_sys::DomException>() {
        if dom.name() == "QuotaExceededError" {
            return StorageError::QuotaExceeded;
        }
        return StorageError::Unavailable(dom.message());
    }
    StorageError::Unavailable(format!("{err:?}"))
}
