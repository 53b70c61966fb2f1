//! Connections from the engine to the page: the host's change callback and
//! the local-storage bookkeeping mirror.

use ann_core::config::{STORAGE_KEY_DATA, STORAGE_KEY_SELECTING};
use ann_core::EntryValue;
use ann_editor::{SelectionObserver, SelectionSnapshot};
use wasm_bindgen::JsValue;

/// The host's `onChange(entries)`.
///
/// Not an engine observer itself: snapshots are queued while the engine is
/// borrowed and delivered here afterwards, so the callback may call back
/// into the widget.
#[derive(Clone)]
pub struct JsChangeCallback(pub js_sys::Function);

impl JsChangeCallback {
    /// Call the host with `entries` as a plain JS array.
    pub fn deliver(&self, entries: &[EntryValue]) {
        let json = serde_json::to_string(entries).unwrap_or_else(|_| "[]".to_string());
        let value = js_sys::JSON::parse(&json).unwrap_or_else(|_| js_sys::Array::new().into());
        if let Err(e) = self.0.call1(&JsValue::NULL, &value) {
            log::error!("onChange callback threw: {e:?}");
        }
    }
}

/// Writes selection bookkeeping to `window.localStorage`. Debug residue
/// only: nothing ever reads it back.
pub struct LocalStorageMirror {
    storage: web_sys::Storage,
}

impl LocalStorageMirror {
    /// `None` when storage is unavailable (private mode, sandboxed iframe).
    pub fn new() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }

    fn write(&self, key: &str, value: &str) {
        if self.storage.set_item(key, value).is_err() {
            log::warn!("localStorage write failed for {key}");
        }
    }
}

impl SelectionObserver for LocalStorageMirror {
    fn selecting_changed(&mut self, selecting: bool) {
        self.write(STORAGE_KEY_SELECTING, if selecting { "true" } else { "false" });
    }

    fn bookkeeping_changed(&mut self, snapshot: &SelectionSnapshot<'_>) {
        if let Ok(json) = serde_json::to_string(snapshot) {
            self.write(STORAGE_KEY_DATA, &json);
        }
    }
}
