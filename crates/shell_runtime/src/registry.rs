//! App registry keyed by [`AppId`] and the launch-point bindings that resolve through it.

use std::{collections::HashMap, fmt, rc::Rc};

use shell_app_contract::{AppDescriptor, AppId, Launchable};

#[derive(Clone)]
/// Registry entry: launcher metadata plus the mountable capability.
pub struct RegisteredApp {
    /// Metadata shown by launchers and recorded in recents.
    pub descriptor: AppDescriptor,
    /// Capability mounted into the foreground surface.
    pub handle: Rc<dyn Launchable>,
}

impl fmt::Debug for RegisteredApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredApp")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

#[derive(Default, Clone)]
/// Map from [`AppId`] to its registered capability.
///
/// Holds every handle for the lifetime of the shell. Absence of an id is an expected state and
/// routes launches to the placeholder view.
pub struct LaunchableRegistry {
    apps: HashMap<AppId, RegisteredApp>,
}

impl fmt::Debug for LaunchableRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchableRegistry")
            .field("app_ids", &self.app_ids())
            .finish()
    }
}

impl LaunchableRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces `app_id` with fallback metadata. Returns the replaced entry, if any.
    pub fn register_app(
        &mut self,
        app_id: impl Into<AppId>,
        handle: Rc<dyn Launchable>,
    ) -> Option<RegisteredApp> {
        let app_id = app_id.into();
        let descriptor = AppDescriptor::fallback(&app_id);
        self.register_app_with(descriptor, handle)
    }

    /// Adds or replaces an app with explicit metadata. Returns the replaced entry, if any.
    pub fn register_app_with(
        &mut self,
        descriptor: AppDescriptor,
        handle: Rc<dyn Launchable>,
    ) -> Option<RegisteredApp> {
        self.apps.insert(
            descriptor.app_id.clone(),
            RegisteredApp { descriptor, handle },
        )
    }

    /// Removes `app_id`. Later launches of it take the placeholder path.
    pub fn unregister_app(&mut self, app_id: &AppId) -> Option<RegisteredApp> {
        self.apps.remove(app_id)
    }

    /// Looks up a registered app.
    pub fn get(&self, app_id: &AppId) -> Option<&RegisteredApp> {
        self.apps.get(app_id)
    }

    /// Whether `app_id` is registered.
    pub fn contains(&self, app_id: &AppId) -> bool {
        self.apps.contains_key(app_id)
    }

    /// Registered metadata for `app_id`.
    pub fn descriptor(&self, app_id: &AppId) -> Option<&AppDescriptor> {
        self.apps.get(app_id).map(|app| &app.descriptor)
    }

    /// Metadata for `app_id`, falling back to [`AppDescriptor::fallback`] when unregistered.
    pub fn describe(&self, app_id: &AppId) -> AppDescriptor {
        self.descriptor(app_id)
            .cloned()
            .unwrap_or_else(|| AppDescriptor::fallback(app_id))
    }

    /// Registered ids in sorted order.
    pub fn app_ids(&self) -> Vec<AppId> {
        let mut ids = self.apps.keys().cloned().collect::<Vec<_>>();
        ids.sort();
        ids
    }

    /// Registered metadata sorted by id.
    pub fn descriptors(&self) -> Vec<AppDescriptor> {
        let mut descriptors = self
            .apps
            .values()
            .map(|app| app.descriptor.clone())
            .collect::<Vec<_>>();
        descriptors.sort_by(|a, b| a.app_id.cmp(&b.app_id));
        descriptors
    }

    /// Number of registered apps.
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// UI launch point (home icon, dock slot, recents card) bound to an app by id only.
///
/// Resolution happens against the registry on every activation, so re-registering an id is
/// picked up by all existing launch points.
pub struct LaunchPoint {
    /// Target app.
    pub app_id: AppId,
}

impl LaunchPoint {
    /// Binds a launch point to `app_id`.
    pub fn new(app_id: impl Into<AppId>) -> Self {
        Self {
            app_id: app_id.into(),
        }
    }

    /// Whether the target currently resolves to a mountable app.
    pub fn is_launchable(&self, registry: &LaunchableRegistry) -> bool {
        registry.contains(&self.app_id)
    }

    /// Label resolved from current registry metadata.
    pub fn label(&self, registry: &LaunchableRegistry) -> String {
        registry.describe(&self.app_id).display_name
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use shell_app_contract::{ForegroundSurface, DEFAULT_APP_ICON};

    use super::*;

    struct InertApp;

    impl Launchable for InertApp {
        fn mount(&self, _surface: &dyn ForegroundSurface) -> Result<(), String> {
            Ok(())
        }
    }

    #[test]
    fn register_without_metadata_uses_fallback_descriptor() {
        let mut registry = LaunchableRegistry::new();
        assert!(registry.register_app("clock", Rc::new(InertApp)).is_none());

        let descriptor = registry.descriptor(&AppId::from("clock")).expect("registered");
        assert_eq!(descriptor.display_name, "clock");
        assert_eq!(descriptor.icon_ref, DEFAULT_APP_ICON);
    }

    #[test]
    fn reregistering_replaces_entry_and_launch_points_follow() {
        let mut registry = LaunchableRegistry::new();
        let point = LaunchPoint::new("notes");
        assert!(!point.is_launchable(&registry));
        assert_eq!(point.label(&registry), "notes");

        registry.register_app("notes", Rc::new(InertApp));
        let replaced = registry.register_app_with(
            AppDescriptor::new("notes", "Notes", "note"),
            Rc::new(InertApp),
        );
        assert!(replaced.is_some());
        assert_eq!(registry.len(), 1);
        assert!(point.is_launchable(&registry));
        assert_eq!(point.label(&registry), "Notes");

        registry.unregister_app(&AppId::from("notes"));
        assert!(!point.is_launchable(&registry));
    }

    #[test]
    fn app_ids_are_sorted() {
        let mut registry = LaunchableRegistry::new();
        for id in ["weather", "calculator", "notes"] {
            registry.register_app(id, Rc::new(InertApp));
        }
        assert_eq!(
            registry
                .descriptors()
                .into_iter()
                .map(|descriptor| descriptor.app_id)
                .collect::<Vec<_>>(),
            registry.app_ids()
        );
        assert_eq!(
            registry.app_ids(),
            vec![
                AppId::from("calculator"),
                AppId::from("notes"),
                AppId::from("weather")
            ]
        );
    }
}
