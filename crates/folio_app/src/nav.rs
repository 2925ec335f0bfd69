//! Views, anchors and navigation links

use std::fmt;

/// Top-level page the site is showing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum View {
    #[default]
    Home,
    Projects,
    Outdoors,
}

impl View {
    pub const ALL: [View; 3] = [View::Home, View::Projects, View::Outdoors];

    pub fn name(self) -> &'static str {
        match self {
            View::Home => "home",
            View::Projects => "projects",
            View::Outdoors => "outdoors",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named section of the home view a link can jump to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Anchor {
    About,
    Experience,
    Skills,
}

impl Anchor {
    pub fn id(self) -> &'static str {
        match self {
            Anchor::About => "about",
            Anchor::Experience => "experience",
            Anchor::Skills => "skills",
        }
    }
}

/// Where a link takes the page: a view, optionally scrolled to an anchor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavTarget {
    pub view: View,
    pub anchor: Option<Anchor>,
}

impl NavTarget {
    pub const fn view(view: View) -> Self {
        Self { view, anchor: None }
    }

    pub const fn anchor(view: View, anchor: Anchor) -> Self {
        Self {
            view,
            anchor: Some(anchor),
        }
    }
}

/// A navigation bar link
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub target: NavTarget,
}

impl NavItem {
    /// Underlined as the current page
    ///
    /// Only whole-view links can be active; anchor links never are.
    pub fn is_active(&self, current: View) -> bool {
        self.target.anchor.is_none() && self.target.view == current
    }
}

const HOME: NavItem = NavItem {
    label: "Home",
    target: NavTarget::view(View::Home),
};

const LINKS: [NavItem; 4] = [
    NavItem {
        label: "Engineering Projects",
        target: NavTarget::view(View::Projects),
    },
    NavItem {
        label: "Education & Experience",
        target: NavTarget::anchor(View::Home, Anchor::Experience),
    },
    NavItem {
        label: "Technical Skills",
        target: NavTarget::anchor(View::Home, Anchor::Skills),
    },
    NavItem {
        label: "Expeditions & Photography",
        target: NavTarget::view(View::Outdoors),
    },
];

/// Links in the desktop bar. The brand mark doubles as the home link.
pub fn desktop_items() -> &'static [NavItem] {
    &LINKS
}

/// Links in the full-screen mobile menu
pub fn mobile_items() -> Vec<NavItem> {
    std::iter::once(HOME).chain(LINKS).collect()
}

/// Target of the brand mark
pub fn brand_target() -> NavTarget {
    HOME.target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_and_mobile_items() {
        let desktop: Vec<&str> = desktop_items().iter().map(|i| i.label).collect();
        assert_eq!(
            desktop,
            vec![
                "Engineering Projects",
                "Education & Experience",
                "Technical Skills",
                "Expeditions & Photography"
            ]
        );

        let mobile = mobile_items();
        assert_eq!(mobile.len(), 5);
        assert_eq!(mobile[0].label, "Home");
        assert_eq!(&mobile[1..], desktop_items());
    }

    #[test]
    fn test_active_links() {
        let active = |view| {
            desktop_items()
                .iter()
                .filter(|i| i.is_active(view))
                .map(|i| i.label)
                .collect::<Vec<_>>()
        };

        assert_eq!(active(View::Projects), vec!["Engineering Projects"]);
        assert_eq!(active(View::Outdoors), vec!["Expeditions & Photography"]);
        // Anchor links into home are never underlined
        assert!(active(View::Home).is_empty());
    }

    #[test]
    fn test_anchor_ids() {
        assert_eq!(Anchor::Experience.id(), "experience");
        assert_eq!(View::Outdoors.to_string(), "outdoors");
        assert_eq!(brand_target(), NavTarget::view(View::Home));
    }
}
