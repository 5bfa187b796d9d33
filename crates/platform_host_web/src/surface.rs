//! DOM-backed foreground surface and notification panel.
//!
//! Both adapters locate their element by CSS selector on every call and toggle the `visible`
//! class the shell stylesheet keys off. A missing element turns every call into a no-op. Non-wasm
//! builds keep only the visibility flag so the shell can run headless.

use std::cell::Cell;

use shell_app_contract::{AppId, ForegroundSurface, NotificationPanel};

/// Class toggled on the app screen and the notification panel.
pub const VISIBLE_CLASS: &str = "visible";
/// Heading shown by the placeholder view.
pub const PLACEHOLDER_TITLE: &str = "Приложение в разработке";
/// Body text shown by the placeholder view.
pub const PLACEHOLDER_MESSAGE: &str = "Это приложение находится в разработке и пока недоступно.";

#[derive(Debug, Clone)]
/// App screen element hosting the foreground app.
pub struct WebForegroundSurface {
    selector: String,
    visible: Cell<bool>,
}

impl WebForegroundSurface {
    /// Binds to the first element matching `selector`.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            visible: Cell::new(false),
        }
    }

    /// Selector this surface resolves on every call.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Last visibility requested by the shell.
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }
}

impl ForegroundSurface for WebForegroundSurface {
    fn reset(&self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(element) = dom::query(&self.selector) {
            element.set_inner_html("");
        }
    }

    fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
        #[cfg(target_arch = "wasm32")]
        dom::toggle_visible(&self.selector, visible);
    }

    fn show_placeholder(&self, requested: &AppId, display_name: &str) {
        #[cfg(target_arch = "wasm32")]
        if let Err(err) = dom::render_placeholder(&self.selector, requested, display_name) {
            dom::warn(&format!("placeholder render for `{requested}` failed: {err}"));
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (requested, display_name);
        }
    }
}

#[derive(Debug, Clone)]
/// Pull-down notification / quick-settings panel element.
pub struct WebNotificationPanel {
    selector: String,
    #[cfg(not(target_arch = "wasm32"))]
    open: Cell<bool>,
}

impl WebNotificationPanel {
    /// Binds to the first element matching `selector`.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            #[cfg(not(target_arch = "wasm32"))]
            open: Cell::new(false),
        }
    }

    /// Selector this panel resolves on every call.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Expands the panel.
    pub fn show(&self) {
        #[cfg(target_arch = "wasm32")]
        dom::toggle_visible(&self.selector, true);

        #[cfg(not(target_arch = "wasm32"))]
        self.open.set(true);
    }
}

impl NotificationPanel for WebNotificationPanel {
    fn hide(&self) {
        #[cfg(target_arch = "wasm32")]
        dom::toggle_visible(&self.selector, false);

        #[cfg(not(target_arch = "wasm32"))]
        self.open.set(false);
    }

    fn is_visible(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            dom::query(&self.selector)
                .map(|element| element.class_list().contains(VISIBLE_CLASS))
                .unwrap_or(false)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            self.open.get()
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod dom {
    use shell_app_contract::AppId;
    use web_sys::{Document, Element};

    use super::{PLACEHOLDER_MESSAGE, PLACEHOLDER_TITLE, VISIBLE_CLASS};

    pub(super) fn warn(message: &str) {
        web_sys::console::warn_1(&message.into());
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    pub(super) fn query(selector: &str) -> Option<Element> {
        document()?.query_selector(selector).ok().flatten()
    }

    pub(super) fn toggle_visible(selector: &str, visible: bool) {
        let Some(element) = query(selector) else {
            return;
        };
        let classes = element.class_list();
        let result = if visible {
            classes.add_1(VISIBLE_CLASS)
        } else {
            classes.remove_1(VISIBLE_CLASS)
        };
        if let Err(err) = result {
            warn(&format!("toggling `{selector}` failed: {err:?}"));
        }
    }

    fn child(document: &Document, tag: &str, class: &str, text: &str) -> Result<Element, String> {
        let element = document
            .create_element(tag)
            .map_err(|e| format!("create_element({tag}) failed: {e:?}"))?;
        element.set_class_name(class);
        element.set_text_content(Some(text));
        Ok(element)
    }

    pub(super) fn render_placeholder(
        selector: &str,
        requested: &AppId,
        display_name: &str,
    ) -> Result<(), String> {
        let document = document().ok_or_else(|| "document unavailable".to_string())?;
        let host = query(selector).ok_or_else(|| format!("`{selector}` not found"))?;

        let root = child(&document, "div", "app-under-development", "")?;
        root.set_attribute("data-app-id", requested.as_str())
            .map_err(|e| format!("set_attribute failed: {e:?}"))?;
        let parts = [
            child(&document, "span", "app-title", display_name)?,
            child(&document, "h2", "dev-app-title", PLACEHOLDER_TITLE)?,
            child(&document, "p", "dev-app-message", PLACEHOLDER_MESSAGE)?,
        ];
        for part in &parts {
            root.append_child(part)
                .map_err(|e| format!("append_child failed: {e:?}"))?;
        }
        host.append_child(&root)
            .map_err(|e| format!("append_child failed: {e:?}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn native_panel_tracks_visibility() {
        let panel = WebNotificationPanel::new(".notification-panel");
        assert_eq!(panel.selector(), ".notification-panel");
        assert!(!panel.is_visible());
        panel.show();
        assert!(panel.is_visible());
        panel.hide();
        assert!(!panel.is_visible());
    }

    #[test]
    fn surface_remembers_requested_visibility() {
        let surface = WebForegroundSurface::new(".app-screen");
        assert_eq!(surface.selector(), ".app-screen");
        surface.set_visible(true);
        assert!(surface.is_visible());
        surface.reset();
        surface.set_visible(false);
        assert!(!surface.is_visible());
    }
}
