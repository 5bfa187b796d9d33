//! Persisted user preferences layered over compiled-in defaults.

use std::{fmt, rc::Rc};

use leptos::logging;
use platform_host::{load_pref_with, save_pref_with, PrefsStore};
use thiserror::Error;

use crate::settings::{assign, lookup, merge_trees, remove, split_path, SettingsTree, SettingsValue};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors reported by [`ConfigStore`] mutations.
pub enum ConfigError {
    /// The path was empty or contained an empty segment.
    #[error("invalid settings path `{0}`")]
    InvalidPath(String),
    /// The overrides could not be encoded or the byte store rejected the write. The in-memory
    /// change is kept.
    #[error("settings persistence failed: {0}")]
    Persist(String),
    /// An import payload was not a well-formed settings object. Nothing was changed.
    #[error("settings import rejected: {0}")]
    Import(String),
    /// The effective tree could not be encoded for export.
    #[error("settings serialization failed: {0}")]
    Serialize(String),
}

/// Handle returned by [`ConfigStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type SettingsListener = Box<dyn Fn(&SettingsTree)>;

/// Single source of truth for user preferences.
///
/// Reads see `merge(defaults, overrides)`. Writes touch only `overrides`, persist the whole
/// overrides tree under one key, and then notify subscribers with the new effective tree.
pub struct ConfigStore {
    store: Rc<dyn PrefsStore>,
    key: String,
    defaults: SettingsTree,
    overrides: SettingsTree,
    effective: SettingsTree,
    listeners: Vec<(SubscriptionId, SettingsListener)>,
    next_subscription: u64,
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("key", &self.key)
            .field("overrides", &self.overrides)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl ConfigStore {
    /// Loads overrides persisted under `key` and layers them over `defaults`.
    ///
    /// An unreadable or malformed blob is logged and treated as "no overrides".
    pub fn load(store: Rc<dyn PrefsStore>, key: impl Into<String>, defaults: SettingsTree) -> Self {
        let key = key.into();
        let overrides = match load_pref_with::<_, SettingsTree>(store.as_ref(), &key) {
            Ok(Some(tree)) => tree,
            Ok(None) => SettingsTree::new(),
            Err(err) => {
                logging::warn!("settings blob `{key}` is unreadable, using defaults: {err}");
                SettingsTree::new()
            }
        };
        let effective = merge_trees(&defaults, &overrides);
        Self {
            store,
            key,
            defaults,
            overrides,
            effective,
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    /// Compiled-in defaults.
    pub fn defaults(&self) -> &SettingsTree {
        &self.defaults
    }

    /// User overrides as persisted.
    pub fn overrides(&self) -> &SettingsTree {
        &self.overrides
    }

    /// Defaults with overrides merged on top.
    pub fn effective_tree(&self) -> &SettingsTree {
        &self.effective
    }

    /// Reads the value at a dot path.
    ///
    /// When the effective tree has nothing at `path` (for example because an override replaced a
    /// level with a scalar) the default at the same path is returned. `None` means neither layer
    /// has a value there.
    pub fn get(&self, path: &str) -> Option<&SettingsValue> {
        let segments = split_path(path)?;
        lookup(&self.effective, &segments).or_else(|| lookup(&self.defaults, &segments))
    }

    /// Reads the compiled-in default at a dot path.
    pub fn get_default(&self, path: &str) -> Option<&SettingsValue> {
        let segments = split_path(path)?;
        lookup(&self.defaults, &segments)
    }

    /// Stores `value` at `path` in the overrides, then persists and notifies.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidPath`] leaves everything untouched. [`ConfigError::Persist`] keeps
    /// the in-memory write; subscribers are not notified in that case.
    pub fn set(&mut self, path: &str, value: impl Into<SettingsValue>) -> Result<(), ConfigError> {
        let segments = split_path(path).ok_or_else(|| ConfigError::InvalidPath(path.to_string()))?;
        assign(&mut self.overrides, &segments, value.into());
        self.commit()
    }

    /// Drops the override at `path` so reads fall back to the default.
    ///
    /// Returns `Ok(false)` without persisting when there was no override to drop.
    ///
    /// # Errors
    ///
    /// Same contract as [`ConfigStore::set`].
    pub fn reset_path(&mut self, path: &str) -> Result<bool, ConfigError> {
        let segments = split_path(path).ok_or_else(|| ConfigError::InvalidPath(path.to_string()))?;
        if !remove(&mut self.overrides, &segments) {
            return Ok(false);
        }
        self.commit()?;
        Ok(true)
    }

    /// Clears every override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Persist`] when the empty tree could not be written.
    pub fn reset_all(&mut self) -> Result<(), ConfigError> {
        self.overrides.clear();
        self.commit()
    }

    /// Serializes the effective tree as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] when encoding fails.
    pub fn export_tree(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(&self.effective)
            .map_err(|err| ConfigError::Serialize(err.to_string()))
    }

    /// Replaces the overrides with a previously exported tree.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Import`] when `raw` is not a JSON object of settings values; nothing is
    /// changed. [`ConfigError::Persist`] keeps the imported tree in memory.
    pub fn import_tree(&mut self, raw: &str) -> Result<(), ConfigError> {
        let imported = serde_json::from_str::<SettingsTree>(raw)
            .map_err(|err| ConfigError::Import(err.to_string()))?;
        self.overrides = imported;
        self.commit()
    }

    /// Registers `listener` to receive the effective tree after every persisted write.
    pub fn subscribe(&mut self, listener: impl Fn(&SettingsTree) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    fn commit(&mut self) -> Result<(), ConfigError> {
        self.effective = merge_trees(&self.defaults, &self.overrides);
        self.persist()?;
        for (_, listener) in &self.listeners {
            listener(&self.effective);
        }
        Ok(())
    }

    fn persist(&self) -> Result<(), ConfigError> {
        save_pref_with(self.store.as_ref(), &self.key, &self.overrides).map_err(|err| {
            logging::warn!("settings persist for `{}` failed: {err}", self.key);
            ConfigError::Persist(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use platform_host::MemoryPrefsStore;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::settings::{section, tree_of};

    const KEY: &str = "test.settings";

    struct RejectingStore;

    impl PrefsStore for RejectingStore {
        fn load_pref(&self, _key: &str) -> Result<Option<Vec<u8>>, String> {
            Err("storage offline".to_string())
        }

        fn save_pref(&self, _key: &str, _bytes: &[u8]) -> Result<(), String> {
            Err("quota exceeded".to_string())
        }

        fn delete_pref(&self, _key: &str) -> Result<(), String> {
            Err("storage offline".to_string())
        }
    }

    fn defaults() -> SettingsTree {
        tree_of([
            ("language", "ru".into()),
            (
                "appearance",
                section([("fontSize", "medium".into()), ("animations", true.into())]),
            ),
            ("display", section([("brightness", 70.into())])),
        ])
    }

    fn store_with(memory: &MemoryPrefsStore) -> ConfigStore {
        ConfigStore::load(Rc::new(memory.clone()), KEY, defaults())
    }

    #[test]
    fn fresh_store_reads_defaults() {
        let config = store_with(&MemoryPrefsStore::default());
        assert_eq!(config.effective_tree(), &defaults());
        assert_eq!(config.get("appearance.fontSize"), Some(&SettingsValue::from("medium")));
        assert_eq!(config.get("appearance.missing"), None);
        assert_eq!(config.get(""), None);
    }

    #[test]
    fn set_then_get_returns_new_value_and_persists_overrides_only() {
        let memory = MemoryPrefsStore::default();
        let mut config = store_with(&memory);

        config.set("display.brightness", 40).expect("set");
        config.set("apps.notes.autoSave", false).expect("set new branch");

        assert_eq!(config.get("display.brightness"), Some(&SettingsValue::from(40)));
        assert_eq!(config.get("apps.notes.autoSave"), Some(&SettingsValue::from(false)));
        assert_eq!(config.defaults(), &defaults());

        let persisted: serde_json::Value =
            serde_json::from_str(&memory.raw_text(KEY).expect("persisted")).expect("json");
        assert_eq!(
            persisted,
            serde_json::json!({
                "display": {"brightness": 40},
                "apps": {"notes": {"autoSave": false}}
            })
        );
    }

    #[test]
    fn get_falls_back_to_default_when_override_replaced_a_level() {
        let mut config = store_with(&MemoryPrefsStore::default());
        config.set("appearance", "flat").expect("set scalar over level");

        assert_eq!(config.get("appearance"), Some(&SettingsValue::from("flat")));
        assert_eq!(config.get("appearance.fontSize"), Some(&SettingsValue::from("medium")));
    }

    #[test]
    fn set_replaces_scalar_intermediate_with_level() {
        let mut config = store_with(&MemoryPrefsStore::default());
        config.set("language.variant", "ru-RU").expect("set below scalar");
        assert_eq!(config.get("language.variant"), Some(&SettingsValue::from("ru-RU")));
        assert!(config.get("language").map(SettingsValue::is_tree).unwrap_or(false));
    }

    #[test]
    fn invalid_paths_are_rejected_without_mutation() {
        let mut config = store_with(&MemoryPrefsStore::default());
        assert_eq!(
            config.set("display..brightness", 1),
            Err(ConfigError::InvalidPath("display..brightness".to_string()))
        );
        assert!(config.overrides().is_empty());
    }

    #[test]
    fn overrides_survive_reload_and_unknown_keys_are_kept() {
        let memory = MemoryPrefsStore::default();
        {
            let mut config = store_with(&memory);
            config.set("experimental.gestures", true).expect("set");
            config.set("appearance.fontSize", "large").expect("set");
        }

        let reloaded = store_with(&memory);
        assert_eq!(reloaded.get("experimental.gestures"), Some(&SettingsValue::from(true)));
        assert_eq!(reloaded.get("appearance.fontSize"), Some(&SettingsValue::from("large")));
        assert_eq!(reloaded.get("appearance.animations"), Some(&SettingsValue::from(true)));
    }

    #[test]
    fn malformed_blob_falls_back_to_defaults() {
        let memory = MemoryPrefsStore::default();
        memory.insert_raw(KEY, "{\"appearance\": ");
        let config = store_with(&memory);
        assert!(config.overrides().is_empty());
        assert_eq!(config.effective_tree(), &defaults());

        memory.insert_raw(KEY, "[1, 2, 3]");
        assert!(store_with(&memory).overrides().is_empty());
    }

    #[test]
    fn unreadable_store_falls_back_to_defaults() {
        let config = ConfigStore::load(Rc::new(RejectingStore), KEY, defaults());
        assert_eq!(config.effective_tree(), &defaults());
    }

    #[test]
    fn persist_failure_is_reported_but_memory_keeps_the_write() {
        let mut config = ConfigStore::load(Rc::new(RejectingStore), KEY, defaults());
        let notified = Rc::new(Cell::new(0));
        config.subscribe({
            let notified = notified.clone();
            move |_: &SettingsTree| notified.set(notified.get() + 1)
        });

        let err = config.set("display.brightness", 10).expect_err("write fails");
        assert_eq!(err, ConfigError::Persist("quota exceeded".to_string()));
        assert_eq!(config.get("display.brightness"), Some(&SettingsValue::from(10)));
        assert_eq!(notified.get(), 0);
    }

    #[test]
    fn reset_path_restores_default_and_reports_noop() {
        let memory = MemoryPrefsStore::default();
        let mut config = store_with(&memory);
        config.set("appearance.fontSize", "large").expect("set");

        assert_eq!(config.reset_path("appearance.fontSize"), Ok(true));
        assert_eq!(config.get("appearance.fontSize"), Some(&SettingsValue::from("medium")));
        assert!(config.overrides().is_empty());
        assert_eq!(memory.raw_text(KEY).as_deref(), Some("{}"));

        assert_eq!(config.reset_path("appearance.fontSize"), Ok(false));
    }

    #[test]
    fn reset_all_clears_overrides() {
        let mut config = store_with(&MemoryPrefsStore::default());
        config.set("language", "en").expect("set");
        config.set("display.brightness", 5).expect("set");
        config.reset_all().expect("reset");
        assert_eq!(config.effective_tree(), &defaults());
    }

    #[test]
    fn export_then_import_keeps_effective_tree() {
        let mut config = store_with(&MemoryPrefsStore::default());
        config.set("appearance.fontSize", "small").expect("set");
        config.set("extra.flag", true).expect("set");
        let before = config.effective_tree().clone();

        let exported = config.export_tree().expect("export");
        assert!(exported.contains("\n  \"appearance\""));
        config.import_tree(&exported).expect("import");

        assert_eq!(config.effective_tree(), &before);
    }

    #[test]
    fn malformed_import_is_rejected_without_mutation() {
        let memory = MemoryPrefsStore::default();
        let mut config = store_with(&memory);
        config.set("language", "en").expect("set");
        let persisted = memory.raw_text(KEY);

        for payload in ["{oops", "[1]", "\"text\"", "{\"language\": null}"] {
            let err = config.import_tree(payload).expect_err("rejected");
            assert!(matches!(err, ConfigError::Import(_)), "{payload}: {err:?}");
        }
        assert_eq!(config.get("language"), Some(&SettingsValue::from("en")));
        assert_eq!(memory.raw_text(KEY), persisted);
    }

    #[test]
    fn subscribers_see_every_write_in_order_until_unsubscribed() {
        let mut config = store_with(&MemoryPrefsStore::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let id = config.subscribe({
            let seen = seen.clone();
            move |tree: &SettingsTree| {
                let brightness =
                    lookup(tree, &["display", "brightness"]).and_then(SettingsValue::as_i64);
                seen.borrow_mut().push(brightness);
            }
        });

        config.set("display.brightness", 10).expect("set");
        config.set("display.brightness", 20).expect("set");
        config.reset_path("display.brightness").expect("reset");
        assert!(config.unsubscribe(id));
        assert!(!config.unsubscribe(id));
        config.set("display.brightness", 30).expect("set");

        assert_eq!(*seen.borrow(), vec![Some(10), Some(20), Some(70)]);
    }

    #[test]
    fn each_subscriber_sees_each_write_once_in_registration_order() {
        let mut config = store_with(&MemoryPrefsStore::default());
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["status-bar", "settings-screen"] {
            let log = log.clone();
            config.subscribe(move |tree: &SettingsTree| {
                let brightness =
                    lookup(tree, &["display", "brightness"]).and_then(SettingsValue::as_i64);
                log.borrow_mut().push((name, brightness));
            });
        }

        config.set("display.brightness", 30).expect("set");
        config.set("display.brightness", 90).expect("set");

        assert_eq!(
            *log.borrow(),
            vec![
                ("status-bar", Some(30)),
                ("settings-screen", Some(30)),
                ("status-bar", Some(90)),
                ("settings-screen", Some(90)),
            ]
        );
    }
}
