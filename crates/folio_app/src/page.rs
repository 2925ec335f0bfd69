//! Page-level UI state
//!
//! Which view is showing, the mobile menu and modal flags, and scroll
//! tracking. Navigation changes the view immediately but scrolls only after
//! a short settle delay, so the new view has laid out before its anchor is
//! looked up. The scroll arrives as a [`ScrollRequest`] for the host to
//! apply.

use crate::config::NavConfig;
use crate::nav::{Anchor, NavTarget, View};
use crate::scroll::{NavTone, ScrollTracker};
use folio_core::{lock, TimerHandle, TimerId};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

/// Scroll the host should perform
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollRequest {
    ToAnchor(Anchor),
    Top,
}

impl ScrollRequest {
    fn for_target(target: NavTarget) -> Self {
        match target.anchor {
            Some(anchor) => ScrollRequest::ToAnchor(anchor),
            None => ScrollRequest::Top,
        }
    }
}

#[derive(Default)]
struct ScrollQueue {
    pending: Option<TimerId>,
    ready: Vec<ScrollRequest>,
}

pub struct PageState {
    view: View,
    menu_open: bool,
    summary_open: bool,
    open_project: Option<usize>,
    project_count: usize,
    scroll: ScrollTracker,
    settle: Duration,
    timers: TimerHandle,
    queue: Arc<Mutex<ScrollQueue>>,
}

impl PageState {
    pub fn new(config: &NavConfig, project_count: usize, timers: TimerHandle) -> Self {
        Self {
            view: View::default(),
            menu_open: false,
            summary_open: false,
            open_project: None,
            project_count,
            scroll: ScrollTracker::new(config.scrolled_threshold_px, config.parallax_factor),
            settle: config.scroll_settle(),
            timers,
            queue: Arc::new(Mutex::new(ScrollQueue::default())),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Switch view, close the mobile menu and schedule the scroll
    ///
    /// A navigation that arrives before the previous scroll fired replaces
    /// it. Returns true if the view changed.
    pub fn navigate(&mut self, target: NavTarget) -> bool {
        let changed = self.view != target.view;
        self.view = target.view;
        self.menu_open = false;

        let request = ScrollRequest::for_target(target);
        let weak: Weak<Mutex<ScrollQueue>> = Arc::downgrade(&self.queue);
        let mut queue = lock(&self.queue);
        if let Some(previous) = queue.pending.take() {
            self.timers.cancel(previous);
            tracing::trace!("superseded pending scroll");
        }
        queue.pending = self.timers.schedule(self.settle, move || {
            if let Some(queue) = weak.upgrade() {
                let mut queue = lock(&queue);
                queue.pending = None;
                queue.ready.push(request);
            }
        });

        tracing::debug!(view = %target.view, anchor = ?target.anchor.map(Anchor::id), "navigate");
        changed
    }

    /// Scroll requests whose settle delay has elapsed, oldest first
    pub fn take_scroll_requests(&self) -> Vec<ScrollRequest> {
        std::mem::take(&mut lock(&self.queue).ready)
    }

    /// Check if a navigation is still waiting to scroll
    pub fn has_pending_scroll(&self) -> bool {
        lock(&self.queue).pending.is_some()
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn open_summary(&mut self) {
        self.summary_open = true;
    }

    pub fn close_summary(&mut self) {
        self.summary_open = false;
    }

    pub fn is_summary_open(&self) -> bool {
        self.summary_open
    }

    /// Open the detail modal of project `index`, replacing any open one
    pub fn open_project(&mut self, index: usize) -> bool {
        if index >= self.project_count {
            tracing::warn!(index, count = self.project_count, "no such project");
            return false;
        }
        self.open_project = Some(index);
        true
    }

    pub fn close_project(&mut self) {
        self.open_project = None;
    }

    pub fn open_project_index(&self) -> Option<usize> {
        self.open_project
    }

    /// Record the window scroll offset
    pub fn on_scroll(&mut self, y: f32) {
        self.scroll.on_scroll(y);
    }

    pub fn scroll(&self) -> &ScrollTracker {
        &self.scroll
    }

    pub fn is_scrolled(&self) -> bool {
        self.scroll.is_scrolled()
    }

    pub fn parallax_offset(&self) -> f32 {
        self.scroll.parallax_offset()
    }

    pub fn nav_tone(&self) -> NavTone {
        self.scroll.link_tone()
    }

    /// Tone of the brand mark and menu toggle
    pub fn chrome_tone(&self) -> NavTone {
        self.scroll.chrome_tone(self.menu_open)
    }
}

impl Drop for PageState {
    fn drop(&mut self) {
        if let Some(pending) = lock(&self.queue).pending.take() {
            self.timers.cancel(pending);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::TimerScheduler;

    fn page(scheduler: &TimerScheduler) -> PageState {
        PageState::new(&NavConfig::default(), 6, scheduler.handle())
    }

    #[test]
    fn test_navigate_scrolls_after_settle() {
        let scheduler = TimerScheduler::new();
        let mut page = page(&scheduler);
        page.toggle_menu();

        assert!(!page.navigate(NavTarget::anchor(View::Home, Anchor::Skills)));
        assert!(!page.is_menu_open());
        assert!(page.has_pending_scroll());

        scheduler.advance(Duration::from_millis(99));
        assert!(page.take_scroll_requests().is_empty());
        scheduler.advance(Duration::from_millis(1));
        assert_eq!(
            page.take_scroll_requests(),
            vec![ScrollRequest::ToAnchor(Anchor::Skills)]
        );
        assert!(page.take_scroll_requests().is_empty());
    }

    #[test]
    fn test_view_link_scrolls_to_top() {
        let scheduler = TimerScheduler::new();
        let mut page = page(&scheduler);

        assert!(page.navigate(NavTarget::view(View::Outdoors)));
        assert_eq!(page.view(), View::Outdoors);
        scheduler.advance(Duration::from_millis(100));
        assert_eq!(page.take_scroll_requests(), vec![ScrollRequest::Top]);
    }

    #[test]
    fn test_newer_navigation_replaces_pending() {
        let scheduler = TimerScheduler::new();
        let mut page = page(&scheduler);

        page.navigate(NavTarget::view(View::Projects));
        scheduler.advance(Duration::from_millis(60));
        page.navigate(NavTarget::anchor(View::Home, Anchor::Experience));
        assert_eq!(scheduler.pending_count(), 1);

        scheduler.advance(Duration::from_millis(100));
        assert_eq!(
            page.take_scroll_requests(),
            vec![ScrollRequest::ToAnchor(Anchor::Experience)]
        );
        assert_eq!(page.view(), View::Home);
    }

    #[test]
    fn test_drop_cancels_pending_scroll() {
        let scheduler = TimerScheduler::new();
        let mut page = page(&scheduler);
        page.navigate(NavTarget::view(View::Projects));

        drop(page);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_project_modal() {
        let scheduler = TimerScheduler::new();
        let mut page = page(&scheduler);

        assert!(page.open_project(2));
        assert!(page.open_project(4));
        assert_eq!(page.open_project_index(), Some(4));

        assert!(!page.open_project(6));
        assert_eq!(page.open_project_index(), Some(4));

        page.close_project();
        assert_eq!(page.open_project_index(), None);
    }

    #[test]
    fn test_summary_and_menu() {
        let scheduler = TimerScheduler::new();
        let mut page = page(&scheduler);

        page.open_summary();
        assert!(page.is_summary_open());
        page.close_summary();
        assert!(!page.is_summary_open());

        page.toggle_menu();
        assert!(page.is_menu_open());
        page.toggle_menu();
        assert!(!page.is_menu_open());
    }

    #[test]
    fn test_chrome_stays_light_over_menu() {
        let scheduler = TimerScheduler::new();
        let mut page = page(&scheduler);

        page.on_scroll(600.0);
        assert!(page.is_scrolled());
        assert_eq!(page.parallax_offset(), 300.0);
        assert_eq!(page.nav_tone(), NavTone::Dark);
        assert_eq!(page.chrome_tone(), NavTone::Dark);

        page.toggle_menu();
        assert_eq!(page.chrome_tone(), NavTone::Light);
        assert_eq!(page.nav_tone(), NavTone::Dark);
    }
}
