//! Shell boot configuration.

use serde::{Deserialize, Serialize};

/// Default number of entries kept by the recents list.
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;
/// Byte-store key holding the persisted settings overrides.
pub const SETTINGS_PREFS_KEY: &str = "shell.settings.v1";
/// Byte-store key holding the persisted recents list.
pub const RECENTS_PREFS_KEY: &str = "shell.recents.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Tunables read once when the shell context is built.
pub struct ShellConfig {
    /// Maximum recents entries kept. Clamped to at least 1.
    pub history_capacity: usize,
    /// Store key for settings overrides.
    pub settings_key: String,
    /// Store key for the recents list.
    pub recents_key: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            settings_key: SETTINGS_PREFS_KEY.to_string(),
            recents_key: RECENTS_PREFS_KEY.to_string(),
        }
    }
}

impl ShellConfig {
    /// Returns a copy with a different recents capacity.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Returns a copy persisting settings under `key`.
    pub fn with_settings_key(mut self, key: impl Into<String>) -> Self {
        self.settings_key = key.into();
        self
    }

    /// Returns a copy persisting recents under `key`.
    pub fn with_recents_key(mut self, key: impl Into<String>) -> Self {
        self.recents_key = key.into();
        self
    }

    /// Capacity actually applied to the recents list.
    pub fn effective_history_capacity(&self) -> usize {
        self.history_capacity.max(1)
    }
}
