//! Typed host-domain contracts shared by the shell runtime and browser adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes the byte-oriented
//! preference store used for shell persistence and the clock helpers used to stamp recency, while
//! concrete browser adapters live in `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;
pub mod time;

pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsStore,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
