//! Browser (`wasm32`) implementations of the shell host capabilities.
//!
//! [`WebPrefsStore`] persists shell state in `window.localStorage`; [`WebForegroundSurface`] and
//! [`WebNotificationPanel`] drive the app screen and the pull-down panel through DOM class
//! toggles. Every adapter compiles on native targets as an inert fallback so the runtime crates
//! can be tested without a browser.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;
pub mod surface;

pub use storage::local_prefs::WebPrefsStore;
pub use surface::{WebForegroundSurface, WebNotificationPanel, VISIBLE_CLASS};
