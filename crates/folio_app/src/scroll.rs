//! Scroll position tracking
//!
//! Derives the two scroll-dependent bits of page chrome: whether the
//! navigation bar has switched to its solid "scrolled" style, and the hero
//! background's parallax offset.

/// Text colour of navigation bar elements
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavTone {
    /// Light text over hero imagery
    Light,
    /// Dark text on the solid bar
    Dark,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScrollTracker {
    threshold: f32,
    parallax_factor: f32,
    y: f32,
    scrolled: bool,
}

impl ScrollTracker {
    pub fn new(threshold: f32, parallax_factor: f32) -> Self {
        Self {
            threshold,
            parallax_factor,
            y: 0.0,
            scrolled: false,
        }
    }

    /// Record a new scroll offset. Returns true if the scrolled style flipped.
    pub fn on_scroll(&mut self, y: f32) -> bool {
        self.y = y.max(0.0);
        let scrolled = self.y > self.threshold;
        let flipped = scrolled != self.scrolled;
        self.scrolled = scrolled;
        if flipped {
            tracing::trace!(y = self.y, scrolled, "nav style changed");
        }
        flipped
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    /// Vertical offset of the hero background
    pub fn parallax_offset(&self) -> f32 {
        self.y * self.parallax_factor
    }

    /// Tone of the navigation links
    pub fn link_tone(&self) -> NavTone {
        if self.scrolled {
            NavTone::Dark
        } else {
            NavTone::Light
        }
    }

    /// Tone of the brand mark and menu toggle, which sit above the open
    /// mobile menu's backdrop
    pub fn chrome_tone(&self, menu_open: bool) -> NavTone {
        if menu_open {
            NavTone::Light
        } else {
            self.link_tone()
        }
    }
}
