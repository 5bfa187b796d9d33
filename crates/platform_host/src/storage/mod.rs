//! Persistence contracts consumed by the shell runtime.

pub mod prefs;
