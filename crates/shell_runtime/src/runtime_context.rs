//! Leptos provider exposing the shell context and reactive snapshots of its state.
//!
//! The [`ShellContext`] sits behind a [`RefCell`] held in a [`StoredValue`]; every mutation goes
//! through [`ShellRuntimeContext::dispatch`], which runs the closure against the context and only
//! after releasing it refreshes the signals that changed. Effects triggered by those signals
//! therefore never observe the context mid-mutation.
//!
//! App code that runs inside a dispatch (an app's `mount`, for instance) finds the context
//! borrowed. Reads through the snapshot signals keep working there; nested
//! [`ShellRuntimeContext::dispatch`] and [`ShellRuntimeContext::with_shell`] calls are logged and
//! return `None`.
#![allow(clippy::clone_on_copy)]

use std::{cell::RefCell, rc::Rc};

use leptos::*;
use shell_app_contract::{AppDescriptor, AppId};

use crate::{
    config_store::ConfigError,
    history::{HistoryEntry, HistoryError},
    registry::LaunchPoint,
    session::{ForegroundState, LaunchReport},
    settings::{lookup, split_path, SettingsTree, SettingsValue},
    shell::{BackAction, ShellContext},
};

#[derive(Clone, Copy)]
/// Leptos context for reading shell state and dispatching shell operations.
pub struct ShellRuntimeContext {
    shell: StoredValue<Rc<RefCell<ShellContext>>>,
    defaults: StoredValue<SettingsTree>,
    /// Foreground slot occupant.
    pub foreground: RwSignal<ForegroundState>,
    /// Recents list, most recent first.
    pub recents: RwSignal<Vec<HistoryEntry>>,
    /// Recents overlay visibility.
    pub recents_visible: RwSignal<bool>,
    /// Effective settings tree.
    pub settings: RwSignal<SettingsTree>,
    /// Registered app metadata, sorted by id.
    pub apps: RwSignal<Vec<AppDescriptor>>,
}

impl ShellRuntimeContext {
    /// Stores `shell` in the current reactive owner and seeds the snapshot signals from it.
    pub fn new(shell: ShellContext) -> Self {
        let foreground = create_rw_signal(shell.foreground().clone());
        let recents = create_rw_signal(shell.history().list());
        let recents_visible = create_rw_signal(shell.recents_visible());
        let settings = create_rw_signal(shell.settings().effective_tree().clone());
        let apps = create_rw_signal(shell.session().registry().descriptors());
        let defaults = store_value(shell.settings().defaults().clone());
        Self {
            shell: store_value(Rc::new(RefCell::new(shell))),
            defaults,
            foreground,
            recents,
            recents_visible,
            settings,
            apps,
        }
    }

    /// Runs `op` against the shell context, then publishes whatever changed.
    ///
    /// Returns `None`, after logging, when the owning reactive scope has been disposed or when
    /// called from inside another dispatch.
    pub fn dispatch<O>(&self, op: impl FnOnce(&mut ShellContext) -> O) -> Option<O> {
        let Some(shell) = self.shell.try_get_value() else {
            logging::warn!("shell runtime disposed, dropping shell operation");
            return None;
        };
        let output = match shell.try_borrow_mut() {
            Ok(mut shell) => op(&mut shell),
            Err(_) => {
                logging::warn!("shell context busy, dropping nested shell operation");
                return None;
            }
        };
        self.sync();
        Some(output)
    }

    /// Read-only access to the shell context.
    ///
    /// Returns `None`, after logging, when the scope has been disposed or a dispatch is running.
    pub fn with_shell<O>(&self, f: impl FnOnce(&ShellContext) -> O) -> Option<O> {
        let Some(shell) = self.shell.try_get_value() else {
            logging::warn!("shell runtime disposed, shell read skipped");
            return None;
        };
        let output = match shell.try_borrow() {
            Ok(shell) => f(&shell),
            Err(_) => {
                logging::warn!("shell context busy, shell read skipped");
                return None;
            }
        };
        Some(output)
    }

    fn sync(&self) {
        let snapshot = self
            .shell
            .try_get_value()
            .and_then(|shell| {
                shell.try_borrow().ok().map(|shell| {
                    (
                        shell.foreground().clone(),
                        shell.history().list(),
                        shell.recents_visible(),
                        shell.settings().effective_tree().clone(),
                        shell.session().registry().descriptors(),
                    )
                })
            });
        let Some((foreground, recents, recents_visible, settings, apps)) = snapshot else {
            return;
        };

        if self.foreground.with_untracked(|current| *current != foreground) {
            self.foreground.set(foreground);
        }
        if self.recents.with_untracked(|current| *current != recents) {
            self.recents.set(recents);
        }
        if self.recents_visible.get_untracked() != recents_visible {
            self.recents_visible.set(recents_visible);
        }
        if self.settings.with_untracked(|current| *current != settings) {
            self.settings.set(settings);
        }
        if self.apps.with_untracked(|current| *current != apps) {
            self.apps.set(apps);
        }
    }

    /// Launches `app_id`.
    pub fn launch(&self, app_id: impl Into<AppId>) -> Option<LaunchReport> {
        let app_id = app_id.into();
        self.dispatch(move |shell| shell.launch(app_id))
    }

    /// Launches `app_id` from a recents card.
    pub fn launch_from_history(&self, app_id: impl Into<AppId>) -> Option<LaunchReport> {
        let app_id = app_id.into();
        self.dispatch(move |shell| shell.launch_from_history(app_id))
    }

    /// Closes the foreground app.
    pub fn close(&self) {
        self.dispatch(ShellContext::close);
    }

    /// Returns to the home screen.
    pub fn go_home(&self) {
        self.dispatch(ShellContext::go_home);
    }

    /// Dismisses the top-most layer.
    pub fn go_back(&self) -> BackAction {
        self.dispatch(ShellContext::go_back)
            .unwrap_or(BackAction::Nothing)
    }

    /// Opens the recents overlay.
    pub fn show_recents(&self) {
        self.dispatch(ShellContext::show_recents);
    }

    /// Hides the recents overlay.
    pub fn hide_recents(&self) {
        self.dispatch(ShellContext::hide_recents);
    }

    /// Flips the recents overlay.
    pub fn toggle_recents(&self) {
        self.dispatch(ShellContext::toggle_recents);
    }

    /// Drops one recents card, logging a failed write.
    pub fn remove_recent(&self, app_id: impl Into<AppId>) {
        let app_id = app_id.into();
        if let Some(Err(err)) = self.dispatch(move |shell| shell.remove_recent(&app_id)) {
            logging::warn!("remove recent failed: {err}");
        }
    }

    /// Drops every recents card.
    ///
    /// `None` means the operation never ran (see [`ShellRuntimeContext::dispatch`]). An inner
    /// `Err` is the persistence failure; the list is cleared regardless.
    pub fn clear_recents(&self) -> Option<Result<(), HistoryError>> {
        self.dispatch(ShellContext::clear_recents)
    }

    /// Writes a setting.
    ///
    /// `None` means the write never ran. An inner `Err` is an invalid path or a failed write.
    pub fn set_setting(
        &self,
        path: &str,
        value: impl Into<SettingsValue>,
    ) -> Option<Result<(), ConfigError>> {
        let value = value.into();
        self.dispatch(|shell| shell.settings_mut().set(path, value))
    }

    /// Drops the override at `path`.
    ///
    /// `None` means the reset never ran. An inner `Err` is an invalid path or a failed write.
    pub fn reset_setting(&self, path: &str) -> Option<Result<bool, ConfigError>> {
        self.dispatch(|shell| shell.settings_mut().reset_path(path))
    }

    /// Reactive read of one setting, falling back to the compiled-in default when the effective
    /// tree has nothing at `path`.
    pub fn setting(&self, path: &str) -> Option<SettingsValue> {
        let segments = split_path(path)?;
        self.settings
            .with(|tree| lookup(tree, &segments).cloned())
            .or_else(|| {
                self.defaults
                    .try_with_value(|defaults| lookup(defaults, &segments).cloned())
                    .flatten()
            })
    }

    /// Reactive label for `point`: the registered display name, or the id when unregistered.
    pub fn launch_label(&self, point: &LaunchPoint) -> String {
        self.apps
            .with(|apps| {
                apps.iter()
                    .find(|descriptor| descriptor.app_id == point.app_id)
                    .map(|descriptor| descriptor.display_name.clone())
            })
            .unwrap_or_else(|| AppDescriptor::fallback(&point.app_id).display_name)
    }
}

#[component]
/// Provides [`ShellRuntimeContext`] to descendant components.
pub fn ShellProvider(
    /// Shell context assembled by the entry crate.
    shell: ShellContext,
    children: Children,
) -> impl IntoView {
    let runtime = ShellRuntimeContext::new(shell);
    provide_context(runtime.clone());
    children().into_view()
}

/// Returns the current [`ShellRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`ShellProvider`].
pub fn use_shell_runtime() -> ShellRuntimeContext {
    use_context::<ShellRuntimeContext>().expect("ShellRuntimeContext not provided")
}

#[cfg(test)]
mod tests {
    use platform_host::MemoryPrefsStore;
    use pretty_assertions::assert_eq;
    use shell_app_contract::{ForegroundSurface, Launchable};

    use super::*;
    use crate::{config::ShellConfig, registry::LaunchableRegistry, shell::ShellHost};

    struct InertApp;

    impl Launchable for InertApp {
        fn mount(&self, _surface: &dyn ForegroundSurface) -> Result<(), String> {
            Ok(())
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct MountObservations {
        brightness: Option<SettingsValue>,
        shell_read: Option<bool>,
        nested_write: Option<Result<(), ConfigError>>,
    }

    /// App that reaches back into the runtime while it is being mounted.
    struct SettingsAwareApp {
        runtime: ShellRuntimeContext,
        seen: Rc<RefCell<MountObservations>>,
    }

    impl Launchable for SettingsAwareApp {
        fn mount(&self, _surface: &dyn ForegroundSurface) -> Result<(), String> {
            let mut seen = self.seen.borrow_mut();
            seen.brightness = self.runtime.setting("display.brightness");
            seen.shell_read = self.runtime.with_shell(|shell| shell.recents_visible());
            seen.nested_write = self.runtime.set_setting("display.brightness", 10);
            Ok(())
        }
    }

    fn runtime() -> ShellRuntimeContext {
        let mut registry = LaunchableRegistry::new();
        registry.register_app("calculator", Rc::new(InertApp));
        let shell = ShellContext::boot_with_defaults(
            ShellHost::headless(Rc::new(MemoryPrefsStore::default())),
            ShellConfig::default(),
            registry,
        );
        ShellRuntimeContext::new(shell)
    }

    #[test]
    fn dispatch_refreshes_snapshot_signals() {
        let _ = leptos::create_runtime();
        let runtime = runtime();

        let report = runtime.launch("calculator").expect("runtime alive");
        assert!(report.is_mounted());
        assert_eq!(
            runtime.foreground.get_untracked(),
            ForegroundState::Running {
                app_id: AppId::from("calculator")
            }
        );
        assert_eq!(runtime.recents.with_untracked(Vec::len), 1);

        runtime.show_recents();
        assert!(runtime.recents_visible.get_untracked());
        assert_eq!(runtime.go_back(), BackAction::CloseApp);
        assert_eq!(runtime.foreground.get_untracked(), ForegroundState::Idle);
    }

    #[test]
    fn settings_signal_tracks_writes() {
        let _ = leptos::create_runtime();
        let runtime = runtime();

        assert_eq!(
            runtime.setting("display.brightness"),
            Some(SettingsValue::from(70))
        );
        runtime
            .set_setting("display.brightness", 40)
            .expect("runtime alive")
            .expect("set brightness");
        assert_eq!(
            runtime.setting("display.brightness"),
            Some(SettingsValue::from(40))
        );
        assert_eq!(
            runtime.reset_setting("display.brightness"),
            Some(Ok(true))
        );
        assert_eq!(
            runtime.setting("display.brightness"),
            Some(SettingsValue::from(70))
        );
    }

    #[test]
    fn setting_falls_back_to_default_under_scalar_override() {
        let _ = leptos::create_runtime();
        let runtime = runtime();

        runtime
            .set_setting("appearance", "flat")
            .expect("runtime alive")
            .expect("replace section");
        assert_eq!(
            runtime.setting("appearance"),
            Some(SettingsValue::from("flat"))
        );
        assert_eq!(
            runtime.setting("appearance.fontSize"),
            Some(SettingsValue::from("medium"))
        );
        assert_eq!(runtime.setting("appearance.missing"), None);
    }

    #[test]
    fn app_reading_runtime_during_mount_does_not_panic() {
        let _ = leptos::create_runtime();
        let runtime = runtime();
        let seen = Rc::new(RefCell::new(MountObservations::default()));
        let app = Rc::new(SettingsAwareApp {
            runtime,
            seen: seen.clone(),
        });

        runtime
            .dispatch(move |shell| shell.register_app("settings-aware", app))
            .expect("runtime alive");
        let report = runtime.launch("settings-aware").expect("runtime alive");

        assert!(report.is_mounted());
        assert_eq!(
            *seen.borrow(),
            MountObservations {
                brightness: Some(SettingsValue::from(70)),
                shell_read: None,
                nested_write: None,
            }
        );
        assert_eq!(
            runtime.setting("display.brightness"),
            Some(SettingsValue::from(70))
        );
        assert_eq!(runtime.with_shell(ShellContext::recents_visible), Some(false));
    }

    #[test]
    fn launch_label_follows_registration() {
        let _ = leptos::create_runtime();
        let runtime = runtime();
        let point = LaunchPoint::new("notes");
        assert_eq!(runtime.launch_label(&point), "notes");

        runtime
            .dispatch(|shell| {
                shell.register_app_with(
                    AppDescriptor::new("notes", "Notes", "note"),
                    Rc::new(InertApp),
                )
            })
            .expect("runtime alive");
        assert_eq!(runtime.launch_label(&point), "Notes");
    }
}
