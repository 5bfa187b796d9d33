//! Shell state layer: foreground app lifecycle, bounded recents, and layered user settings.
//!
//! [`ShellContext`] is built once at start from injected host capabilities ([`ShellHost`]) and owns
//! the [`ConfigStore`], the [`HistoryTracker`], and the [`ForegroundSession`]. Leptos views reach
//! it through [`ShellProvider`] and [`use_shell_runtime`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod config_store;
pub mod defaults;
pub mod history;
pub mod registry;
pub mod runtime_context;
pub mod session;
pub mod settings;
pub mod shell;

pub use config::{ShellConfig, DEFAULT_HISTORY_CAPACITY, RECENTS_PREFS_KEY, SETTINGS_PREFS_KEY};
pub use config_store::{ConfigError, ConfigStore, SubscriptionId};
pub use defaults::default_settings;
pub use history::{HistoryEntry, HistoryError, HistoryTracker};
pub use registry::{LaunchPoint, LaunchableRegistry, RegisteredApp};
pub use runtime_context::{use_shell_runtime, ShellProvider, ShellRuntimeContext};
pub use session::{ForegroundSession, ForegroundState, LaunchOutcome, LaunchReport, StubReason};
pub use settings::{merge_trees, Scalar, SettingsTree, SettingsValue};
pub use shell::{BackAction, ShellContext, ShellHost};
pub use shell_app_contract::{AppDescriptor, AppId, ForegroundSurface, Launchable, NotificationPanel};
