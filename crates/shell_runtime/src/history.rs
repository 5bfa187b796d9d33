//! Bounded most-recently-used list of launched apps (the recents screen).

use std::{collections::HashSet, fmt, rc::Rc};

use leptos::logging;
use platform_host::{load_pref_with, next_monotonic_timestamp_ms, save_pref_with, PrefsStore};
use serde::{Deserialize, Serialize};
use shell_app_contract::{AppDescriptor, AppId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors reported by [`HistoryTracker`] mutations.
pub enum HistoryError {
    /// The list could not be encoded or the byte store rejected the write. The in-memory list
    /// keeps the change.
    #[error("recents persistence failed: {0}")]
    Persist(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One recents card.
pub struct HistoryEntry {
    /// App the card launches.
    #[serde(rename = "id")]
    pub app_id: AppId,
    /// Title shown on the card.
    #[serde(rename = "name")]
    pub display_name: String,
    /// Icon glyph name.
    #[serde(rename = "icon")]
    pub icon_ref: String,
    /// Unix milliseconds of the last launch.
    #[serde(rename = "timestamp")]
    pub timestamp_ms: u64,
}

/// Most-recent-first list of app launches.
///
/// Never holds two entries for the same app and never holds more than `capacity` entries once an
/// operation returns. Every mutation is written through to the byte store.
pub struct HistoryTracker {
    store: Rc<dyn PrefsStore>,
    key: String,
    capacity: usize,
    entries: Vec<HistoryEntry>,
    clock: fn() -> u64,
}

impl fmt::Debug for HistoryTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryTracker")
            .field("key", &self.key)
            .field("capacity", &self.capacity)
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl HistoryTracker {
    /// Loads the list persisted under `key`.
    ///
    /// A malformed blob is logged and replaced by an empty list. A valid one is normalized:
    /// repeated ids keep only their first (most recent) entry and the tail past `capacity` is
    /// dropped. `capacity` is clamped to at least 1.
    pub fn load(store: Rc<dyn PrefsStore>, key: impl Into<String>, capacity: usize) -> Self {
        let key = key.into();
        let capacity = capacity.max(1);
        let entries = match load_pref_with::<_, Vec<HistoryEntry>>(store.as_ref(), &key) {
            Ok(Some(entries)) => normalize(entries, capacity),
            Ok(None) => Vec::new(),
            Err(err) => {
                logging::warn!("recents blob `{key}` is unreadable, starting empty: {err}");
                Vec::new()
            }
        };
        Self {
            store,
            key,
            capacity,
            entries,
            clock: next_monotonic_timestamp_ms,
        }
    }

    /// Replaces the timestamp source.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    /// Moves `app_id` to the front with a fresh timestamp, evicting from the tail past capacity.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Persist`] when the write fails; the list still holds the change.
    pub fn record(
        &mut self,
        app_id: AppId,
        display_name: impl Into<String>,
        icon_ref: impl Into<String>,
    ) -> Result<(), HistoryError> {
        self.entries.retain(|entry| entry.app_id != app_id);
        self.entries.insert(
            0,
            HistoryEntry {
                app_id,
                display_name: display_name.into(),
                icon_ref: icon_ref.into(),
                timestamp_ms: (self.clock)(),
            },
        );
        self.entries.truncate(self.capacity);
        debug_assert!(self.is_consistent(), "recents invariant violated: {self:?}");
        self.persist()
    }

    /// Records an app using its launcher metadata.
    ///
    /// # Errors
    ///
    /// Same contract as [`HistoryTracker::record`].
    pub fn record_descriptor(&mut self, descriptor: &AppDescriptor) -> Result<(), HistoryError> {
        self.record(
            descriptor.app_id.clone(),
            descriptor.display_name.clone(),
            descriptor.icon_ref.clone(),
        )
    }

    /// Removes the entry for `app_id`. Returns `Ok(false)` without writing when there was none.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Persist`] when the write fails; the entry stays removed.
    pub fn remove(&mut self, app_id: &AppId) -> Result<bool, HistoryError> {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.app_id != *app_id);
        if self.entries.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Empties the list.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Persist`] when the write fails; the list stays empty.
    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.entries.clear();
        self.persist()
    }

    /// Returns an owned snapshot, most recent first.
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.entries.clone()
    }

    /// Borrowed view of the current entries, most recent first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Most recent entry.
    pub fn front(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    /// Whether `app_id` has an entry.
    pub fn contains(&self, app_id: &AppId) -> bool {
        self.entries.iter().any(|entry| entry.app_id == *app_id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn is_consistent(&self) -> bool {
        let mut seen = HashSet::new();
        self.entries.len() <= self.capacity
            && self.entries.iter().all(|entry| seen.insert(&entry.app_id))
    }

    fn persist(&self) -> Result<(), HistoryError> {
        save_pref_with(self.store.as_ref(), &self.key, &self.entries).map_err(|err| {
            logging::warn!("recents persist for `{}` failed: {err}", self.key);
            HistoryError::Persist(err)
        })
    }
}

fn normalize(entries: Vec<HistoryEntry>, capacity: usize) -> Vec<HistoryEntry> {
    let mut seen = HashSet::new();
    let mut normalized = entries
        .into_iter()
        .filter(|entry| seen.insert(entry.app_id.clone()))
        .collect::<Vec<_>>();
    normalized.truncate(capacity);
    normalized
}
