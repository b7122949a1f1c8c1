//! Header icon and settings popup
//!
//! The icon is added to the host header once `.headerRight` exists, and
//! re-added on the next mutation if the host re-renders its header. The
//! popup lets the user switch the overlay off or force a theme; both
//! changes are written to the settings store and applied by reloading.

use seasonals_config::{ENABLED_KEY, SettingsStore, THEME_KEY, UserPreference};
use seasonals_effects::{Host, HostEvent, NodeId, Selector};
use seasonals_theme::{AUTO_THEME, display_name, selectable_themes};

/// Host header region the icon is prepended to
pub const HEADER_CLASS: &str = "headerRight";
pub const ICON_CLASS: &str = "seasonal-settings-button";
pub const POPUP_CLASS: &str = "seasonal-settings-popup";
pub const ENABLE_TOGGLE_ID: &str = "seasonal-enable-toggle";
pub const THEME_SELECT_ID: &str = "seasonal-theme-select";

const ICON_IMAGE: &str = "../Seasonals/Resources/assets/logo_SW.svg";

/// Below this viewport width the popup hugs the right edge
const NARROW_VIEWPORT: f64 = 450.0;
/// Minimum room left of the icon's right edge for an anchored popup
const MIN_ANCHOR_ROOM: f64 = 260.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Popup {
    root: NodeId,
    toggle: NodeId,
    select: NodeId,
}

/// Client-side settings UI
#[derive(Debug, Default)]
pub struct SettingsPanel {
    popup: Option<Popup>,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The icon currently in the header
    pub fn icon(&self, host: &dyn Host) -> Option<NodeId> {
        host.query(Selector::Class(ICON_CLASS))
    }

    pub fn is_open(&self) -> bool {
        self.popup.is_some()
    }

    /// Add the icon if the header is present and has none yet
    ///
    /// Returns true if an icon was created.
    pub fn inject_icon(&mut self, host: &mut dyn Host) -> bool {
        let Some(header) = host.query(Selector::Class(HEADER_CLASS)) else {
            return false;
        };
        if self.icon(host).is_some() {
            return false;
        }

        let button = host.create_element("button");
        host.set_attribute(button, "type", "button");
        host.set_class_name(button, &format!("paper-icon-button-light headerButton {ICON_CLASS}"));
        host.set_attribute(button, "title", "Seasonal Settings");
        host.set_style(button, "vertical-align", "middle");

        let img = host.create_element("img");
        host.set_attribute(img, "src", ICON_IMAGE);
        host.set_attribute(img, "draggable", "false");
        host.set_style(img, "width", "24px");
        host.set_style(img, "height", "24px");
        host.set_style(img, "pointer-events", "none");
        host.append_child(button, img);

        host.prepend_child(header, button);
        true
    }

    /// Open the popup below the icon, or close it if open
    pub fn toggle(&mut self, host: &mut dyn Host, store: &dyn SettingsStore) {
        if self.is_open() {
            self.close(host);
        } else if let Some(icon) = self.icon(host) {
            self.open(host, store, icon);
        }
    }

    pub fn close(&mut self, host: &mut dyn Host) {
        if let Some(popup) = self.popup.take() {
            host.remove(popup.root);
        }
    }

    fn open(&mut self, host: &mut dyn Host, store: &dyn SettingsStore, anchor: NodeId) {
        if let Some(stale) = host.query(Selector::Class(POPUP_CLASS)) {
            host.remove(stale);
        }

        let root = host.create_element("div");
        host.set_class_name(root, &format!("{POPUP_CLASS} dialog"));
        for (property, value) in [
            ("position", "fixed"),
            ("z-index", "10000"),
            ("background-color", "#202020"),
            ("padding", "1em"),
            ("border-radius", "0.3em"),
            ("box-shadow", "0 0 20px rgba(0,0,0,0.5)"),
            ("min-width", "200px"),
            ("max-width", "250px"),
            ("color", "#fff"),
        ] {
            host.set_style(root, property, value);
        }
        position_popup(host, root, anchor);

        let heading = host.create_element("h3");
        host.set_text(heading, "Seasonal Settings");
        host.append_child(root, heading);

        let preference = UserPreference::load(store);

        let checkbox_row = host.create_element("div");
        host.set_class_name(checkbox_row, "checkboxContainer checkboxContainer-withDescription");
        let toggle = host.create_element("input");
        host.set_attribute(toggle, "id", ENABLE_TOGGLE_ID);
        host.set_attribute(toggle, "type", "checkbox");
        host.set_class_name(toggle, "emby-checkbox");
        if preference.enabled {
            host.set_attribute(toggle, "checked", "checked");
        }
        let toggle_label = host.create_element("span");
        host.set_class_name(toggle_label, "checkboxLabel");
        host.set_text(toggle_label, "Enable Seasonals");
        host.append_child(checkbox_row, toggle);
        host.append_child(checkbox_row, toggle_label);
        host.append_child(root, checkbox_row);

        let select_row = host.create_element("div");
        host.set_class_name(select_row, "selectContainer");
        let select_label = host.create_element("label");
        host.set_class_name(select_label, "selectLabel");
        host.set_attribute(select_label, "for", THEME_SELECT_ID);
        host.set_text(select_label, "Force Theme");
        let select = host.create_element("select");
        host.set_attribute(select, "id", THEME_SELECT_ID);
        host.set_class_name(select, "emby-select");

        let options = std::iter::once((AUTO_THEME, "Server-Side".to_string()))
            .chain(selectable_themes().map(|t| (t.name, display_name(t.name))));
        for (value, label) in options {
            let option = host.create_element("option");
            host.set_attribute(option, "value", value);
            host.set_text(option, &label);
            if value == preference.theme {
                host.set_attribute(option, "selected", "selected");
            }
            host.append_child(select, option);
        }
        host.set_attribute(select, "value", &preference.theme);

        host.append_child(select_row, select_label);
        host.append_child(select_row, select);
        host.append_child(root, select_row);

        let body = host.body();
        host.append_child(body, root);
        self.popup = Some(Popup { root, toggle, select });
    }

    /// React to clicks and control changes. Returns true if the event was ours.
    pub fn handle(&mut self, host: &mut dyn Host, store: &mut dyn SettingsStore, event: &HostEvent) -> bool {
        match event {
            HostEvent::Mutation => {
                self.inject_icon(host);
                false
            }
            HostEvent::Click(target) => {
                if let Some(icon) = self.icon(host).filter(|icon| host.contains(*icon, *target)) {
                    if self.is_open() {
                        self.close(host);
                    } else {
                        self.open(host, store, icon);
                    }
                    return true;
                }
                match self.popup {
                    Some(popup) if !host.contains(popup.root, *target) => {
                        self.close(host);
                        true
                    }
                    Some(_) => true,
                    None => false,
                }
            }
            HostEvent::Change { node, value } => {
                let Some(popup) = self.popup else {
                    return false;
                };
                let key = if *node == popup.toggle {
                    ENABLED_KEY
                } else if *node == popup.select {
                    THEME_KEY
                } else {
                    return false;
                };
                match store.set(key, value) {
                    Ok(()) => host.reload(),
                    Err(e) => log::error!("Seasonals: Failed to save {key}: {e}"),
                }
                true
            }
            HostEvent::Resize(_) => false,
        }
    }
}

/// Fixed position under the anchor, right-aligned to it when there is room
fn position_popup(host: &mut dyn Host, popup: NodeId, anchor: NodeId) {
    let rect = host.bounding_rect(anchor);
    let viewport = host.viewport().width;
    let right = viewport - rect.x1;

    if viewport < NARROW_VIEWPORT || viewport - right < MIN_ANCHOR_ROOM {
        host.set_style(popup, "right", "1rem");
    } else {
        host.set_style(popup, "right", &format!("{right}px"));
    }
    host.set_style(popup, "left", "auto");
    host.set_style(popup, "top", &format!("{}px", rect.y1 + 10.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use seasonals_config::MemorySettings;
    use seasonals_effects::MemoryPage;
    use vello::kurbo::{Rect, Size};

    fn page_with_header(width: f64) -> MemoryPage {
        let mut page = MemoryPage::with_viewport(Size::new(width, 800.0));
        let body = page.body();
        let header = page.add_element(body, "div", HEADER_CLASS);
        page.add_element(header, "button", "headerUserButton");
        page
    }

    #[test]
    fn test_icon_waits_for_header() {
        let mut page = MemoryPage::new();
        let mut panel = SettingsPanel::new();
        assert!(!panel.inject_icon(&mut page));

        let body = page.body();
        page.add_element(body, "div", HEADER_CLASS);
        assert!(panel.inject_icon(&mut page));
        assert_eq!(page.count(ICON_CLASS), 1);
    }

    #[test]
    fn test_icon_is_prepended() {
        let mut page = page_with_header(1280.0);
        let mut panel = SettingsPanel::new();
        panel.inject_icon(&mut page);
        let header = page.query_all(HEADER_CLASS)[0];
        let first = page.children(header)[0];
        assert!(page.has_class(first, ICON_CLASS));
    }

    #[test]
    fn test_popup_reflects_store() {
        let mut page = page_with_header(1280.0);
        let store = MemorySettings::new()
            .with(ENABLED_KEY, "false")
            .with(THEME_KEY, "ressurection");
        let mut panel = SettingsPanel::new();
        panel.inject_icon(&mut page);
        panel.toggle(&mut page, &store);

        let toggle = page.query(Selector::Id(ENABLE_TOGGLE_ID)).unwrap();
        assert_eq!(page.attribute(toggle, "checked"), None);
        let select = page.query(Selector::Id(THEME_SELECT_ID)).unwrap();
        assert_eq!(page.attribute(select, "value"), Some("resurrection"));

        let options = page.children(select);
        assert_eq!(options.len(), 14);
        assert_eq!(page.attribute(options[0], "value"), Some("auto"));
        assert_eq!(page.text(options[0]), Some("Server-Side"));
        assert_eq!(page.text(options[1]), Some("Snowflakes"));
    }

    #[test]
    fn test_popup_position() {
        let mut page = page_with_header(1280.0);
        let mut panel = SettingsPanel::new();
        let store = MemorySettings::new();
        panel.inject_icon(&mut page);
        let icon = panel.icon(&page).unwrap();
        page.set_rect(icon, Rect::new(1180.0, 10.0, 1220.0, 50.0));

        panel.toggle(&mut page, &store);
        let popup = page.query(Selector::Class(POPUP_CLASS)).unwrap();
        assert_eq!(page.style(popup, "right"), Some("60px"));
        assert_eq!(page.style(popup, "top"), Some("60px"));

        panel.toggle(&mut page, &store);
        page.set_rect(icon, Rect::new(100.0, 10.0, 140.0, 50.0));
        panel.toggle(&mut page, &store);
        let popup = page.query(Selector::Class(POPUP_CLASS)).unwrap();
        assert_eq!(page.style(popup, "right"), Some("1rem"));
    }

    #[test]
    fn test_narrow_viewport_hugs_edge() {
        let mut page = page_with_header(400.0);
        let mut panel = SettingsPanel::new();
        let store = MemorySettings::new();
        panel.inject_icon(&mut page);
        let icon = panel.icon(&page).unwrap();
        page.set_rect(icon, Rect::new(340.0, 10.0, 380.0, 50.0));
        panel.toggle(&mut page, &store);
        let popup = page.query(Selector::Class(POPUP_CLASS)).unwrap();
        assert_eq!(page.style(popup, "right"), Some("1rem"));
    }

    #[test]
    fn test_click_flow() {
        let mut page = page_with_header(1280.0);
        let mut store = MemorySettings::new();
        let mut panel = SettingsPanel::new();
        panel.inject_icon(&mut page);
        let icon = panel.icon(&page).unwrap();
        let icon_image = page.children(icon)[0];

        assert!(panel.handle(&mut page, &mut store, &HostEvent::Click(icon_image)));
        assert!(panel.is_open());

        let heading = page.children(page.query_all(POPUP_CLASS)[0])[0];
        panel.handle(&mut page, &mut store, &HostEvent::Click(heading));
        assert!(panel.is_open());

        let body = page.body();
        panel.handle(&mut page, &mut store, &HostEvent::Click(body));
        assert!(!panel.is_open());
        assert_eq!(page.count(POPUP_CLASS), 0);
    }

    #[test]
    fn test_change_writes_and_reloads() {
        let mut page = page_with_header(1280.0);
        let mut store = MemorySettings::new();
        let mut panel = SettingsPanel::new();
        panel.inject_icon(&mut page);
        panel.toggle(&mut page, &store);

        let select = page.query(Selector::Id(THEME_SELECT_ID)).unwrap();
        let event = HostEvent::Change { node: select, value: "easter".to_string() };
        assert!(panel.handle(&mut page, &mut store, &event));
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("easter"));
        assert_eq!(page.reload_count(), 1);

        let toggle = page.query(Selector::Id(ENABLE_TOGGLE_ID)).unwrap();
        let event = HostEvent::Change { node: toggle, value: "false".to_string() };
        panel.handle(&mut page, &mut store, &event);
        assert_eq!(store.get(ENABLED_KEY).as_deref(), Some("false"));
        assert_eq!(page.reload_count(), 2);
    }
}
