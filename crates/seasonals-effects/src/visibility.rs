//! Hide the overlay while the host is busy
//!
//! The overlay must stay out of the way of video playback, trailers, the
//! admin dashboard and the user menu. The controller is re-evaluated on
//! every host mutation and reports only transitions.

use crate::host::{Host, Selector};

/// Class of the main video player
pub const VIDEO_PLAYER_CLASS: &str = "videoPlayerContainer";
/// Class of the trailer player
pub const TRAILER_PLAYER_CLASS: &str = "youtubePlayerContainer";
/// Body class present on dashboard pages
pub const DASHBOARD_BODY_CLASS: &str = "dashboardDocument";
/// Id of the open user menu
pub const USER_MENU_ID: &str = "app-user-menu";

/// Overlay display state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }

    fn display(self) -> &'static str {
        match self {
            Visibility::Visible => "block",
            Visibility::Hidden => "none",
        }
    }
}

/// Which host markers are currently present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostMarkers {
    pub video_player: bool,
    pub trailer_player: bool,
    pub dashboard: bool,
    pub user_menu: bool,
}

impl HostMarkers {
    /// Inspect the host page
    pub fn detect(host: &dyn Host) -> Self {
        Self {
            video_player: host.query(Selector::Class(VIDEO_PLAYER_CLASS)).is_some(),
            trailer_player: host.query(Selector::Class(TRAILER_PLAYER_CLASS)).is_some(),
            dashboard: host.has_class(host.body(), DASHBOARD_BODY_CLASS),
            user_menu: host.query(Selector::Id(USER_MENU_ID)).is_some(),
        }
    }

    /// Hidden iff at least one marker is present
    pub fn visibility(&self) -> Visibility {
        if self.video_player || self.trailer_player || self.dashboard || self.user_menu {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }
}

/// Two-state display controller for one theme's container
#[derive(Debug, Clone)]
pub struct VisibilityController {
    container_class: &'static str,
    /// Used in log lines, e.g. "Autumn"
    label: String,
    state: Option<Visibility>,
}

impl VisibilityController {
    pub fn new(container_class: &'static str, label: impl Into<String>) -> Self {
        Self {
            container_class,
            label: label.into(),
            state: None,
        }
    }

    /// Current state; `None` until the first evaluation found the container
    pub fn state(&self) -> Option<Visibility> {
        self.state
    }

    /// Re-check host markers and update the container's display
    ///
    /// Returns the new state on a transition (the first successful
    /// evaluation counts as one) and `None` otherwise. Without a container
    /// this is a no-op.
    pub fn evaluate(&mut self, host: &mut dyn Host) -> Option<Visibility> {
        let container = host.query(Selector::Class(self.container_class))?;
        let next = HostMarkers::detect(host).visibility();

        let previous = self.state;
        if previous == Some(next) {
            return None;
        }

        host.set_style(container, "display", next.display());
        self.state = Some(next);

        match (previous, next) {
            (Some(Visibility::Hidden), Visibility::Visible) => log::info!("{} visible", self.label),
            (_, Visibility::Hidden) => log::info!("{} hidden", self.label),
            _ => {}
        }

        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryPage;

    fn page_with_container() -> (MemoryPage, crate::NodeId) {
        let mut page = MemoryPage::new();
        let body = page.body();
        let container = page.add_element(body, "div", "seasonals-container autumn-container");
        (page, container)
    }

    #[test]
    fn test_no_container_is_noop() {
        let mut page = MemoryPage::new();
        let mut controller = VisibilityController::new("autumn-container", "Autumn");
        assert_eq!(controller.evaluate(&mut page), None);
        assert_eq!(controller.state(), None);
    }

    #[test]
    fn test_first_evaluation_is_a_transition() {
        let (mut page, container) = page_with_container();
        let mut controller = VisibilityController::new("autumn-container", "Autumn");

        assert_eq!(controller.evaluate(&mut page), Some(Visibility::Visible));
        assert_eq!(page.style(container, "display"), Some("block"));
        assert_eq!(controller.evaluate(&mut page), None);
    }

    #[test]
    fn test_each_marker_hides() {
        let markers: [fn(&mut MemoryPage); 4] = [
            |p| {
                let body = p.body();
                p.add_element(body, "div", VIDEO_PLAYER_CLASS);
            },
            |p| {
                let body = p.body();
                p.add_element(body, "div", TRAILER_PLAYER_CLASS);
            },
            |p| p.add_body_class(DASHBOARD_BODY_CLASS),
            |p| {
                let body = p.body();
                let menu = p.add_element(body, "div", "");
                p.set_attribute(menu, "id", USER_MENU_ID);
            },
        ];

        for add_marker in markers {
            let (mut page, container) = page_with_container();
            let mut controller = VisibilityController::new("autumn-container", "Autumn");
            controller.evaluate(&mut page);

            add_marker(&mut page);
            assert_eq!(controller.evaluate(&mut page), Some(Visibility::Hidden));
            assert_eq!(page.style(container, "display"), Some("none"));
        }
    }

    #[test]
    fn test_marker_removal_restores() {
        let (mut page, container) = page_with_container();
        let body = page.body();
        let player = page.add_element(body, "div", VIDEO_PLAYER_CLASS);

        let mut controller = VisibilityController::new("autumn-container", "Autumn");
        assert_eq!(controller.evaluate(&mut page), Some(Visibility::Hidden));
        assert_eq!(controller.evaluate(&mut page), None);

        page.remove(player);
        assert_eq!(controller.evaluate(&mut page), Some(Visibility::Visible));
        assert_eq!(page.style(container, "display"), Some("block"));
    }

    #[test]
    fn test_markers_detect() {
        let mut page = MemoryPage::new();
        assert_eq!(HostMarkers::detect(&page), HostMarkers::default());
        page.add_body_class(DASHBOARD_BODY_CLASS);
        let markers = HostMarkers::detect(&page);
        assert!(markers.dashboard);
        assert_eq!(markers.visibility(), Visibility::Hidden);
    }
}
