//! Shared contract types between the shell runtime and the app modules it hosts.
//!
//! App modules expose one [`Launchable`] capability per [`AppId`]. The runtime mounts it into the
//! single [`ForegroundSurface`] while the app is in the foreground and unmounts it when the app
//! leaves; the app never touches the surface outside those two calls.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// Icon reference used when an app registers without one.
pub const DEFAULT_APP_ICON: &str = "apps";

/// Opaque, stable identifier for a registrable application.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(String);

impl AppId {
    /// Creates an app id from any string-like value.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for AppId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl AsRef<str> for AppId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Launcher-facing metadata for a registered app.
pub struct AppDescriptor {
    /// Registry key.
    pub app_id: AppId,
    /// Human-readable name shown in launchers and the recents list.
    pub display_name: String,
    /// Icon glyph name.
    pub icon_ref: String,
}

impl AppDescriptor {
    /// Creates a descriptor with an explicit name and icon.
    pub fn new(
        app_id: impl Into<AppId>,
        display_name: impl Into<String>,
        icon_ref: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            display_name: display_name.into(),
            icon_ref: icon_ref.into(),
        }
    }

    /// Descriptor used for apps that registered without metadata or are not registered at all:
    /// the id doubles as the display name and the icon is [`DEFAULT_APP_ICON`].
    pub fn fallback(app_id: &AppId) -> Self {
        Self {
            app_id: app_id.clone(),
            display_name: app_id.as_str().to_string(),
            icon_ref: DEFAULT_APP_ICON.to_string(),
        }
    }
}

/// The single mount point hosting the foreground app.
///
/// Only the foreground session writes to it.
pub trait ForegroundSurface {
    /// Clears whatever the previous occupant rendered.
    fn reset(&self);

    /// Shows or hides the surface container.
    fn set_visible(&self, visible: bool);

    /// Renders the "not available yet" view for an id without a mountable handle.
    fn show_placeholder(&self, requested: &AppId, display_name: &str);
}

/// Capability exported by an app module.
pub trait Launchable {
    /// Renders the app into `surface`.
    ///
    /// # Errors
    ///
    /// Returns a message when the host layer could not mount the app. The shell then falls back
    /// to the placeholder view.
    fn mount(&self, surface: &dyn ForegroundSurface) -> Result<(), String>;

    /// Tears the app down when it leaves the foreground.
    fn unmount(&self) {}
}

/// Notification / quick-settings panel that shares the foreground with the app surface.
pub trait NotificationPanel {
    /// Collapses the panel. Hiding an already hidden panel is a no-op.
    fn hide(&self);

    /// Reports whether the panel is currently expanded.
    fn is_visible(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Surface used by headless builds; accepts every call and renders nothing.
pub struct NoopForegroundSurface;

impl ForegroundSurface for NoopForegroundSurface {
    fn reset(&self) {}

    fn set_visible(&self, _visible: bool) {}

    fn show_placeholder(&self, _requested: &AppId, _display_name: &str) {}
}

#[derive(Debug, Clone, Copy, Default)]
/// Panel used when the host has no notification panel.
pub struct NoopNotificationPanel;

impl NotificationPanel for NoopNotificationPanel {
    fn hide(&self) {}
}
