//! Byte-oriented preference storage contracts and adapters.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Host service for persisted shell state, addressed by string key and stored as raw bytes.
///
/// Calls are synchronous: the shell runs one event to completion before handling the next, and
/// every write is reported back to the caller exactly once.
pub trait PrefsStore {
    /// Reads the raw bytes stored under `key`, or `None` when nothing was written yet.
    fn load_pref(&self, key: &str) -> Result<Option<Vec<u8>>, String>;

    /// Replaces the bytes stored under `key`.
    fn save_pref(&self, key: &str, bytes: &[u8]) -> Result<(), String>;

    /// Deletes a key. Deleting an absent key succeeds.
    fn delete_pref(&self, key: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op preference store for unsupported targets and baseline tests.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref(&self, _key: &str) -> Result<Option<Vec<u8>>, String> {
        Ok(None)
    }

    fn save_pref(&self, _key: &str, _bytes: &[u8]) -> Result<(), String> {
        Ok(())
    }

    fn delete_pref(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory preference store keyed by string.
///
/// Clones share the same backing map, so a test can keep one handle while the shell owns another.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl MemoryPrefsStore {
    /// Seeds `key` with raw bytes, bypassing [`PrefsStore::save_pref`].
    pub fn insert_raw(&self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.inner.borrow_mut().insert(key.into(), bytes.into());
    }

    /// Returns the stored bytes for `key` decoded as UTF-8 text, if present and valid.
    pub fn raw_text(&self, key: &str) -> Option<String> {
        self.inner
            .borrow()
            .get(key)
            .and_then(|bytes| String::from_utf8(bytes.clone()).ok())
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref(&self, key: &str) -> Result<Option<Vec<u8>>, String> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn save_pref(&self, key: &str, bytes: &[u8]) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete_pref(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

/// Loads and deserializes a typed JSON value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store read or JSON deserialization fails.
pub fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_pref(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_slice(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes a typed value as JSON and saves it through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_vec(value).map_err(|e| e.to_string())?;
    store.save_pref(key, &raw)
}
