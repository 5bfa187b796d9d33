//! Browser entry crate: wires the web host adapters into a [`ShellContext`] and mounts the shell.

use std::rc::Rc;

use platform_host_web::{WebForegroundSurface, WebNotificationPanel, WebPrefsStore};
use shell_runtime::{LaunchableRegistry, ShellConfig, ShellContext, ShellHost};

mod web_app;

pub use web_app::SiteApp;

/// Element hosting the foreground app.
pub const APP_SCREEN_SELECTOR: &str = ".app-screen";
/// Pull-down notification panel element.
pub const NOTIFICATION_PANEL_SELECTOR: &str = ".notification-panel";

/// Builds the shell context over `localStorage` and the page's app screen and panel.
///
/// App modules register themselves into `registry`; ids without a registration open the
/// placeholder view.
pub fn build_shell_context(registry: LaunchableRegistry) -> ShellContext {
    let host = ShellHost {
        prefs: Rc::new(WebPrefsStore),
        surface: Rc::new(WebForegroundSurface::new(APP_SCREEN_SELECTOR)),
        panel: Rc::new(WebNotificationPanel::new(NOTIFICATION_PANEL_SELECTOR)),
    };
    ShellContext::boot_with_defaults(host, ShellConfig::default(), registry)
}

#[cfg(all(feature = "csr", target_arch = "wasm32"))]
pub fn mount() {
    console_error_panic_hook::set_once();
    let shell = build_shell_context(LaunchableRegistry::new());
    leptos::mount_to_body(move || leptos::view! { <SiteApp shell=shell /> })
}

#[cfg(test)]
mod tests {
    use shell_runtime::ForegroundState;

    use super::*;

    #[test]
    fn native_shell_boots_idle_with_defaults() {
        let mut shell = build_shell_context(LaunchableRegistry::new());
        assert_eq!(shell.foreground(), &ForegroundState::Idle);
        assert!(shell.settings().get("darkMode").is_some());

        let report = shell.launch("weather");
        assert!(!report.is_mounted());
        assert!(shell.session().is_active());
        assert_eq!(shell.go_back(), shell_runtime::BackAction::CloseApp);
    }
}
