//! The assembled page
//!
//! [`Portfolio`] owns the page state and the components of the current view.
//! Changing view tears the old view down (its reveals release their
//! observations and the hero typewriter cancels its timers) and mounts the
//! new one with fresh components, the same way the sections would be
//! recreated on screen.

use crate::config::FolioConfig;
use crate::content::Content;
use crate::layout::{PageLayout, Section, SectionId};
use crate::nav::{NavTarget, View};
use crate::page::PageState;
use folio_core::{ElementId, IntersectionSource, TimerHandle, Viewport};
use folio_motion::{Presentation, Reveal, Typewriter, TypewriterFrame};
use std::sync::Arc;

struct Mounted {
    section: Section,
    element: ElementId,
    reveal: Option<Reveal>,
}

/// Render-facing status of one section
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionStatus {
    pub id: SectionId,
    pub visible: bool,
    pub presentation: Presentation,
}

pub struct Portfolio {
    content: Content,
    config: FolioConfig,
    timers: TimerHandle,
    viewport: Viewport,
    source: Arc<dyn IntersectionSource>,
    page: PageState,
    layout: PageLayout,
    width: f32,
    mounted: Vec<Mounted>,
    hero: Option<Typewriter>,
}

impl Portfolio {
    /// Mount the home view, observing intersections on `viewport` itself
    pub fn new(
        content: Content,
        config: FolioConfig,
        timers: TimerHandle,
        viewport: Viewport,
        width: f32,
    ) -> Self {
        let source: Arc<dyn IntersectionSource> = Arc::new(viewport.clone());
        Self::with_source(content, config, timers, viewport, source, width)
    }

    /// Mount the home view with a separate intersection source
    pub fn with_source(
        content: Content,
        config: FolioConfig,
        timers: TimerHandle,
        viewport: Viewport,
        source: Arc<dyn IntersectionSource>,
        width: f32,
    ) -> Self {
        let page = PageState::new(&config.nav, content.projects.len(), timers.clone());
        let layout = PageLayout::compute(page.view(), &content, width, viewport.height());
        let mut portfolio = Self {
            content,
            config,
            timers,
            viewport,
            source,
            page,
            layout,
            width,
            mounted: Vec::new(),
            hero: None,
        };
        portfolio.mount_view();
        portfolio
    }

    fn mount_view(&mut self) {
        let view = self.page.view();
        self.layout =
            PageLayout::compute(view, &self.content, self.width, self.viewport.height());

        for section in self.layout.sections() {
            let element = self.viewport.mount(section.bounds);
            let reveal = section.reveal.map(|delay| {
                let style = self.config.reveal.style().with_delay(delay);
                let mut reveal = Reveal::new(style).with_clock(self.timers.clone());
                reveal.attach(Arc::clone(&self.source), element);
                reveal
            });
            self.mounted.push(Mounted {
                section: *section,
                element,
                reveal,
            });
        }

        if view == View::Home {
            self.hero = Some(Typewriter::start(
                self.timers.clone(),
                self.content.phrases.iter().cloned(),
                self.config.typewriter.timing(),
            ));
        }
        tracing::debug!(%view, sections = self.mounted.len(), "view mounted");
    }

    fn unmount_view(&mut self) {
        self.hero = None;
        for mounted in self.mounted.drain(..) {
            // Release the observation before the element goes away
            drop(mounted.reveal);
            self.viewport.unmount(mounted.element);
        }
    }

    /// Follow a navigation link
    pub fn navigate(&mut self, target: NavTarget) {
        if self.page.navigate(target) {
            self.unmount_view();
            self.mount_view();
        }
    }

    /// Apply scroll requests whose settle delay has elapsed
    ///
    /// Returns the number applied.
    pub fn apply_scroll_requests(&mut self) -> usize {
        let requests = self.page.take_scroll_requests();
        for request in &requests {
            let y = self.layout.scroll_target(*request, self.viewport.height());
            tracing::debug!(?request, y, "scrolling");
            self.scroll_to(y);
        }
        requests.len()
    }

    pub fn scroll_to(&mut self, y: f32) {
        self.viewport.scroll_to(y);
        self.page.on_scroll(self.viewport.scroll_y());
    }

    /// Relayout for a new window size
    ///
    /// Sections move and the viewport changes height together, so a section
    /// is only revealed if its new bounds are on screen.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.layout = PageLayout::compute(self.page.view(), &self.content, width, height);

        let mut moves = Vec::with_capacity(self.mounted.len());
        for (mounted, section) in self.mounted.iter_mut().zip(self.layout.sections()) {
            mounted.section = *section;
            moves.push((mounted.element, section.bounds));
        }
        if let Err(err) = self.viewport.relayout(height, &moves) {
            tracing::warn!(%err, "failed to relayout sections");
            self.viewport.resize(height);
        }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    pub fn view(&self) -> View {
        self.page.view()
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    /// Menu and modal flags
    pub fn page_mut(&mut self) -> &mut PageState {
        &mut self.page
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Hero typewriter frame, on the home view
    pub fn hero_frame(&self) -> Option<TypewriterFrame> {
        self.hero.as_ref().map(Typewriter::frame)
    }

    /// Status of every section of the current view
    pub fn sections(&self) -> Vec<SectionStatus> {
        self.mounted.iter().map(|m| self.status(m)).collect()
    }

    pub fn section(&self, id: SectionId) -> Option<SectionStatus> {
        self.mounted
            .iter()
            .find(|m| m.section.id == id)
            .map(|m| self.status(m))
    }

    /// Check if a section is visible. Sections without a reveal always are.
    pub fn is_revealed(&self, id: SectionId) -> Option<bool> {
        self.section(id).map(|s| s.visible)
    }

    fn status(&self, mounted: &Mounted) -> SectionStatus {
        match &mounted.reveal {
            Some(reveal) => SectionStatus {
                id: mounted.section.id,
                visible: reveal.is_visible(),
                presentation: reveal.presentation(),
            },
            None => SectionStatus {
                id: mounted.section.id,
                visible: true,
                presentation: Presentation::VISIBLE,
            },
        }
    }
}

impl Drop for Portfolio {
    fn drop(&mut self) {
        self.unmount_view();
    }
}
