//! Single-slot foreground lifecycle: which app, if any, occupies the app screen.

use std::{fmt, rc::Rc};

use leptos::logging;
use serde::{Deserialize, Serialize};
use shell_app_contract::{AppDescriptor, AppId, ForegroundSurface, Launchable, NotificationPanel};

use crate::{
    history::{HistoryError, HistoryTracker},
    registry::{LaunchableRegistry, RegisteredApp},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
/// Occupant of the foreground slot.
pub enum ForegroundState {
    /// Nothing in the foreground; the home screen is showing.
    #[default]
    Idle,
    /// A registered app is mounted.
    Running {
        /// Mounted app.
        app_id: AppId,
    },
    /// The placeholder view is showing for an app that could not be mounted.
    Stub {
        /// Id the user asked for.
        requested_id: AppId,
    },
}

impl ForegroundState {
    /// Id of the app occupying the slot, mounted or not.
    pub fn app_id(&self) -> Option<&AppId> {
        match self {
            Self::Idle => None,
            Self::Running { app_id } => Some(app_id),
            Self::Stub { requested_id } => Some(requested_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Why a launch ended on the placeholder view.
pub enum StubReason {
    /// No handle is registered for the id.
    NotRegistered,
    /// The handle rejected the mount.
    MountFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of a launch for the foreground slot.
pub enum LaunchOutcome {
    /// The app handle is mounted.
    Mounted,
    /// The placeholder view is showing.
    Stub(StubReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Everything a caller may want to know about one `launch` call.
pub struct LaunchReport {
    /// Requested app.
    pub app_id: AppId,
    /// What ended up in the foreground.
    pub outcome: LaunchOutcome,
    /// Recents writes that failed during the call. The in-memory recents list is still updated.
    pub history_failures: Vec<HistoryError>,
}

impl LaunchReport {
    /// Whether the requested app handle was mounted.
    pub fn is_mounted(&self) -> bool {
        self.outcome == LaunchOutcome::Mounted
    }

    /// Whether every recents write succeeded.
    pub fn history_persisted(&self) -> bool {
        self.history_failures.is_empty()
    }
}

/// Sole writer of the foreground surface.
///
/// Borrows registered handles only while their app is in the foreground and keeps the surface
/// consistent with [`ForegroundState`]: a handle is mounted exactly when the state is
/// [`ForegroundState::Running`].
pub struct ForegroundSession {
    registry: LaunchableRegistry,
    surface: Rc<dyn ForegroundSurface>,
    panel: Rc<dyn NotificationPanel>,
    state: ForegroundState,
    mounted: Option<Rc<dyn Launchable>>,
}

impl fmt::Debug for ForegroundSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForegroundSession")
            .field("registry", &self.registry)
            .field("state", &self.state)
            .field("mounted", &self.mounted.is_some())
            .finish_non_exhaustive()
    }
}

impl ForegroundSession {
    /// Creates an idle session over the given surface and panel.
    pub fn new(
        registry: LaunchableRegistry,
        surface: Rc<dyn ForegroundSurface>,
        panel: Rc<dyn NotificationPanel>,
    ) -> Self {
        Self {
            registry,
            surface,
            panel,
            state: ForegroundState::Idle,
            mounted: None,
        }
    }

    /// Brings `app_id` to the foreground.
    ///
    /// Records the outgoing app (when one is running and differs) and then the requested app in
    /// `history`, in that order. The notification panel is hidden. Unregistered ids and mount
    /// failures end in [`ForegroundState::Stub`]; neither is an error.
    pub fn launch(&mut self, app_id: AppId, history: &mut HistoryTracker) -> LaunchReport {
        let mut history_failures = Vec::new();

        if let ForegroundState::Running { app_id: outgoing } = &self.state {
            if *outgoing != app_id {
                let descriptor = self.registry.describe(outgoing);
                if let Err(err) = history.record_descriptor(&descriptor) {
                    history_failures.push(err);
                }
            }
        }

        self.panel.hide();
        self.teardown();

        let descriptor = self.registry.describe(&app_id);
        let outcome = match self.registry.get(&app_id).cloned() {
            Some(RegisteredApp { handle, .. }) => match handle.mount(self.surface.as_ref()) {
                Ok(()) => {
                    self.surface.set_visible(true);
                    self.mounted = Some(handle);
                    self.state = ForegroundState::Running {
                        app_id: app_id.clone(),
                    };
                    LaunchOutcome::Mounted
                }
                Err(err) => {
                    logging::warn!("mount of `{app_id}` failed, showing placeholder: {err}");
                    self.enter_stub(&descriptor);
                    LaunchOutcome::Stub(StubReason::MountFailed(err))
                }
            },
            None => {
                logging::log!("`{app_id}` is not registered, showing placeholder");
                self.enter_stub(&descriptor);
                LaunchOutcome::Stub(StubReason::NotRegistered)
            }
        };

        if let Err(err) = history.record_descriptor(&descriptor) {
            history_failures.push(err);
        }

        LaunchReport {
            app_id,
            outcome,
            history_failures,
        }
    }

    /// Launch entry point used by the recents list. Same contract as [`ForegroundSession::launch`].
    pub fn launch_from_history(
        &mut self,
        app_id: AppId,
        history: &mut HistoryTracker,
    ) -> LaunchReport {
        self.launch(app_id, history)
    }

    /// Empties the foreground slot. Returns `false` without side effects when already idle.
    pub fn close(&mut self) -> bool {
        if self.state == ForegroundState::Idle {
            return false;
        }
        self.teardown();
        self.surface.set_visible(false);
        self.panel.hide();
        self.state = ForegroundState::Idle;
        true
    }

    /// Adds or replaces `app_id` with fallback metadata.
    pub fn register_app(&mut self, app_id: impl Into<AppId>, handle: Rc<dyn Launchable>) {
        self.registry.register_app(app_id, handle);
    }

    /// Adds or replaces an app with explicit metadata.
    pub fn register_app_with(&mut self, descriptor: AppDescriptor, handle: Rc<dyn Launchable>) {
        self.registry.register_app_with(descriptor, handle);
    }

    /// Removes `app_id` from the registry. A mounted instance stays mounted until it leaves.
    pub fn unregister_app(&mut self, app_id: &AppId) -> bool {
        self.registry.unregister_app(app_id).is_some()
    }

    /// Registry consulted on every launch.
    pub fn registry(&self) -> &LaunchableRegistry {
        &self.registry
    }

    /// Current foreground state.
    pub fn state(&self) -> &ForegroundState {
        &self.state
    }

    /// Id of the mounted app. `None` while idle or showing the placeholder.
    pub fn current_app_id(&self) -> Option<&AppId> {
        match &self.state {
            ForegroundState::Running { app_id } => Some(app_id),
            _ => None,
        }
    }

    /// Whether a registered app is mounted.
    pub fn is_running(&self) -> bool {
        matches!(self.state, ForegroundState::Running { .. })
    }

    /// Whether the slot is occupied by an app or the placeholder.
    pub fn is_active(&self) -> bool {
        self.state != ForegroundState::Idle
    }

    fn teardown(&mut self) {
        if let Some(handle) = self.mounted.take() {
            handle.unmount();
        }
        self.surface.reset();
    }

    fn enter_stub(&mut self, descriptor: &AppDescriptor) {
        self.surface.reset();
        self.surface
            .show_placeholder(&descriptor.app_id, &descriptor.display_name);
        self.surface.set_visible(true);
        self.state = ForegroundState::Stub {
            requested_id: descriptor.app_id.clone(),
        };
    }
}
