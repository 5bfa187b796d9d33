//! Shell context object: the one place the core components are constructed and reached from.

use std::rc::Rc;

use platform_host::{NoopPrefsStore, PrefsStore};
use shell_app_contract::{
    AppDescriptor, AppId, ForegroundSurface, Launchable, NoopForegroundSurface,
    NoopNotificationPanel, NotificationPanel,
};

use crate::{
    config::ShellConfig,
    config_store::ConfigStore,
    defaults::default_settings,
    history::{HistoryError, HistoryTracker},
    registry::{LaunchPoint, LaunchableRegistry},
    session::{ForegroundSession, ForegroundState, LaunchReport},
    settings::SettingsTree,
};

#[derive(Clone)]
/// Host capabilities injected by the entry crate.
pub struct ShellHost {
    /// Byte store shared by settings and recents under distinct keys.
    pub prefs: Rc<dyn PrefsStore>,
    /// Foreground app screen.
    pub surface: Rc<dyn ForegroundSurface>,
    /// Notification / quick-settings panel.
    pub panel: Rc<dyn NotificationPanel>,
}

impl ShellHost {
    /// Host with the given store and no rendering surfaces.
    pub fn headless(prefs: Rc<dyn PrefsStore>) -> Self {
        Self {
            prefs,
            surface: Rc::new(NoopForegroundSurface),
            panel: Rc::new(NoopNotificationPanel),
        }
    }
}

impl Default for ShellHost {
    /// Headless host that persists nothing.
    fn default() -> Self {
        Self::headless(Rc::new(NoopPrefsStore))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Layer dismissed by [`ShellContext::go_back`].
pub enum BackAction {
    /// The foreground app (or placeholder) was closed.
    CloseApp,
    /// The notification panel was collapsed.
    HidePanel,
    /// The recents overlay was hidden.
    HideRecents,
    /// Nothing was open.
    Nothing,
}

/// Shell state built once at start and passed to whoever needs it.
pub struct ShellContext {
    config: ShellConfig,
    settings: ConfigStore,
    history: HistoryTracker,
    session: ForegroundSession,
    panel: Rc<dyn NotificationPanel>,
    recents_visible: bool,
}

impl ShellContext {
    /// Loads settings and recents from `host.prefs` and starts with an idle foreground.
    pub fn boot(
        host: ShellHost,
        config: ShellConfig,
        defaults: SettingsTree,
        registry: LaunchableRegistry,
    ) -> Self {
        let settings = ConfigStore::load(host.prefs.clone(), config.settings_key.clone(), defaults);
        let history = HistoryTracker::load(
            host.prefs,
            config.recents_key.clone(),
            config.effective_history_capacity(),
        );
        let session = ForegroundSession::new(registry, host.surface, host.panel.clone());
        Self {
            config,
            settings,
            history,
            session,
            panel: host.panel,
            recents_visible: false,
        }
    }

    /// [`ShellContext::boot`] with the compiled-in [`default_settings`] catalogue.
    pub fn boot_with_defaults(
        host: ShellHost,
        config: ShellConfig,
        registry: LaunchableRegistry,
    ) -> Self {
        Self::boot(host, config, default_settings(), registry)
    }

    /// Configuration the context was built with.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Settings store.
    pub fn settings(&self) -> &ConfigStore {
        &self.settings
    }

    /// Mutable settings store, for settings screens.
    pub fn settings_mut(&mut self) -> &mut ConfigStore {
        &mut self.settings
    }

    /// Recents list.
    pub fn history(&self) -> &HistoryTracker {
        &self.history
    }

    /// Foreground session.
    pub fn session(&self) -> &ForegroundSession {
        &self.session
    }

    /// Current foreground state.
    pub fn foreground(&self) -> &ForegroundState {
        self.session.state()
    }

    /// Launches `app_id` from the home screen or any other launcher.
    pub fn launch(&mut self, app_id: impl Into<AppId>) -> LaunchReport {
        self.session.launch(app_id.into(), &mut self.history)
    }

    /// Launches from a recents card: hides the overlay, then behaves like [`ShellContext::launch`].
    pub fn launch_from_history(&mut self, app_id: impl Into<AppId>) -> LaunchReport {
        self.recents_visible = false;
        self.session
            .launch_from_history(app_id.into(), &mut self.history)
    }

    /// Launches whatever `point` is bound to, resolved against the registry now.
    pub fn activate(&mut self, point: &LaunchPoint) -> LaunchReport {
        self.launch(point.app_id.clone())
    }

    /// Closes the foreground app. Returns `false` when already idle.
    pub fn close(&mut self) -> bool {
        self.session.close()
    }

    /// Adds or replaces an app with fallback metadata.
    pub fn register_app(&mut self, app_id: impl Into<AppId>, handle: Rc<dyn Launchable>) {
        self.session.register_app(app_id, handle);
    }

    /// Adds or replaces an app with explicit metadata.
    pub fn register_app_with(&mut self, descriptor: AppDescriptor, handle: Rc<dyn Launchable>) {
        self.session.register_app_with(descriptor, handle);
    }

    /// Opens the recents overlay. The notification panel is collapsed first.
    pub fn show_recents(&mut self) {
        self.panel.hide();
        self.recents_visible = true;
    }

    /// Hides the recents overlay.
    pub fn hide_recents(&mut self) {
        self.recents_visible = false;
    }

    /// Flips the recents overlay and returns the new visibility.
    pub fn toggle_recents(&mut self) -> bool {
        if self.recents_visible {
            self.hide_recents();
        } else {
            self.show_recents();
        }
        self.recents_visible
    }

    /// Whether the recents overlay is open.
    pub fn recents_visible(&self) -> bool {
        self.recents_visible
    }

    /// Returns to the home screen, dismissing every layer.
    pub fn go_home(&mut self) {
        self.session.close();
        self.panel.hide();
        self.recents_visible = false;
    }

    /// Dismisses the top-most open layer: app, then panel, then recents.
    pub fn go_back(&mut self) -> BackAction {
        if self.session.close() {
            BackAction::CloseApp
        } else if self.panel.is_visible() {
            self.panel.hide();
            BackAction::HidePanel
        } else if self.recents_visible {
            self.recents_visible = false;
            BackAction::HideRecents
        } else {
            BackAction::Nothing
        }
    }

    /// Drops one recents card.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Persist`] when the write fails; the card stays removed.
    pub fn remove_recent(&mut self, app_id: &AppId) -> Result<bool, HistoryError> {
        self.history.remove(app_id)
    }

    /// Drops every recents card.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Persist`] when the write fails; the list stays empty.
    pub fn clear_recents(&mut self) -> Result<(), HistoryError> {
        self.history.clear()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use platform_host::MemoryPrefsStore;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct TogglePanel {
        visible: Cell<bool>,
    }

    impl NotificationPanel for TogglePanel {
        fn hide(&self) {
            self.visible.set(false);
        }

        fn is_visible(&self) -> bool {
            self.visible.get()
        }
    }

    struct InertApp;

    impl Launchable for InertApp {
        fn mount(&self, _surface: &dyn ForegroundSurface) -> Result<(), String> {
            Ok(())
        }
    }

    fn shell_with_panel() -> (ShellContext, Rc<TogglePanel>) {
        let panel = Rc::new(TogglePanel::default());
        let host = ShellHost {
            prefs: Rc::new(MemoryPrefsStore::default()),
            surface: Rc::new(NoopForegroundSurface),
            panel: panel.clone(),
        };
        let mut registry = LaunchableRegistry::new();
        registry.register_app("calculator", Rc::new(InertApp));
        let shell = ShellContext::boot_with_defaults(host, ShellConfig::default(), registry);
        (shell, panel)
    }

    #[test]
    fn default_host_boots_without_persisting() {
        let mut shell = ShellContext::boot_with_defaults(
            ShellHost::default(),
            ShellConfig::default(),
            LaunchableRegistry::new(),
        );
        shell.launch("notes");
        assert!(shell.history().contains(&AppId::from("notes")));

        let rebooted = ShellContext::boot_with_defaults(
            ShellHost::default(),
            ShellConfig::default(),
            LaunchableRegistry::new(),
        );
        assert!(rebooted.history().is_empty());
    }

    #[test]
    fn back_dismisses_layers_top_down() {
        let (mut shell, panel) = shell_with_panel();
        shell.show_recents();
        panel.visible.set(true);
        shell.launch("calculator");
        panel.visible.set(true);

        assert_eq!(shell.go_back(), BackAction::CloseApp);
        panel.visible.set(true);
        assert_eq!(shell.go_back(), BackAction::HidePanel);
        assert_eq!(shell.go_back(), BackAction::HideRecents);
        assert_eq!(shell.go_back(), BackAction::Nothing);
    }

    #[test]
    fn show_recents_collapses_panel() {
        let (mut shell, panel) = shell_with_panel();
        panel.visible.set(true);
        assert!(shell.toggle_recents());
        assert!(!panel.is_visible());
        assert!(!shell.toggle_recents());
    }

    #[test]
    fn launch_from_history_hides_recents() {
        let (mut shell, _panel) = shell_with_panel();
        shell.launch("calculator");
        shell.go_home();
        shell.show_recents();

        let report = shell.launch_from_history("calculator");
        assert!(report.is_mounted());
        assert!(!shell.recents_visible());
        assert!(shell.session().is_running());
    }

    #[test]
    fn go_home_clears_every_layer() {
        let (mut shell, panel) = shell_with_panel();
        shell.launch("calculator");
        shell.show_recents();
        panel.visible.set(true);

        shell.go_home();
        assert_eq!(shell.foreground(), &ForegroundState::Idle);
        assert!(!panel.is_visible());
        assert!(!shell.recents_visible());
    }

    #[test]
    fn activate_resolves_launch_point_at_call_time() {
        let (mut shell, _panel) = shell_with_panel();
        let point = LaunchPoint::new("weather");
        assert!(!shell.activate(&point).is_mounted());

        shell.register_app("weather", Rc::new(InertApp));
        assert!(shell.activate(&point).is_mounted());
    }
}
