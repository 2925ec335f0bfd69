//! Vertical page layout
//!
//! Stacks each view's sections top to bottom at fixed design heights so the
//! viewport has real bounds to observe. Only the sections that fade in on
//! scroll carry a reveal delay.

use crate::content::{Content, ExpeditionSize};
use crate::nav::{Anchor, View};
use crate::page::ScrollRequest;
use folio_core::Bounds;
use std::time::Duration;

const SUMMARY_BAR_HEIGHT: f32 = 96.0;
const ABOUT_HEIGHT: f32 = 1100.0;
const SECTION_HEADER_HEIGHT: f32 = 200.0;
const JOB_HEIGHT: f32 = 260.0;
const SKILL_ROW_HEIGHT: f32 = 300.0;
const SKILL_COLUMNS: usize = 3;
const FOOTER_HEIGHT: f32 = 400.0;
const VIEW_HEADER_HEIGHT: f32 = 500.0;
const PROJECT_ROW_HEIGHT: f32 = 600.0;
const PROJECT_GAP: f32 = 128.0;
const STATS_HEIGHT: f32 = 160.0;
const GALLERY_COLUMNS: usize = 3;
const GALLERY_ROW_HEIGHT: f32 = 352.0;

/// Delay of the about section's photo column behind its text
pub const HIGHLIGHTS_DELAY: Duration = Duration::from_millis(200);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionId {
    Hero,
    SummaryBar,
    AboutStory,
    AboutHighlights,
    Experience,
    Skills,
    ProjectsHeader,
    ProjectRow(usize),
    OutdoorsHeader,
    Stats,
    Gallery,
    Footer,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Section {
    pub id: SectionId,
    pub bounds: Bounds,
    /// Entry delay if the section fades in on scroll
    pub reveal: Option<Duration>,
}

/// Laid-out sections of one view
#[derive(Clone, Debug, PartialEq)]
pub struct PageLayout {
    view: View,
    sections: Vec<Section>,
    height: f32,
}

struct Stack {
    width: f32,
    y: f32,
    sections: Vec<Section>,
}

impl Stack {
    fn push(&mut self, id: SectionId, height: f32, reveal: Option<Duration>) {
        self.sections.push(Section {
            id,
            bounds: Bounds::row(self.y, self.width, height),
            reveal,
        });
        self.y += height;
    }

    fn gap(&mut self, height: f32) {
        self.y += height;
    }
}

impl PageLayout {
    /// Lay out `view` for a window of the given size
    pub fn compute(view: View, content: &Content, width: f32, viewport_height: f32) -> Self {
        let mut stack = Stack {
            width,
            y: 0.0,
            sections: Vec::new(),
        };

        match view {
            View::Home => {
                stack.push(SectionId::Hero, viewport_height, None);
                stack.push(SectionId::SummaryBar, SUMMARY_BAR_HEIGHT, None);

                // Text and photo columns share a row
                let top = stack.y;
                let half = width / 2.0;
                stack.sections.push(Section {
                    id: SectionId::AboutStory,
                    bounds: Bounds::new(0.0, top, half, ABOUT_HEIGHT),
                    reveal: Some(Duration::ZERO),
                });
                stack.sections.push(Section {
                    id: SectionId::AboutHighlights,
                    bounds: Bounds::new(half, top, width - half, ABOUT_HEIGHT),
                    reveal: Some(HIGHLIGHTS_DELAY),
                });
                stack.gap(ABOUT_HEIGHT);

                let jobs = content.education.len().max(content.experience.len());
                stack.push(
                    SectionId::Experience,
                    SECTION_HEADER_HEIGHT + JOB_HEIGHT * jobs as f32,
                    None,
                );
                let skill_rows = content.skills.len().div_ceil(SKILL_COLUMNS);
                stack.push(
                    SectionId::Skills,
                    SECTION_HEADER_HEIGHT + SKILL_ROW_HEIGHT * skill_rows as f32,
                    None,
                );
            }
            View::Projects => {
                stack.push(SectionId::ProjectsHeader, VIEW_HEADER_HEIGHT, None);
                stack.gap(PROJECT_GAP);
                for index in 0..content.projects.len() {
                    if index > 0 {
                        stack.gap(PROJECT_GAP);
                    }
                    stack.push(
                        SectionId::ProjectRow(index),
                        PROJECT_ROW_HEIGHT,
                        Some(Duration::ZERO),
                    );
                }
                stack.gap(PROJECT_GAP);
            }
            View::Outdoors => {
                stack.push(SectionId::OutdoorsHeader, VIEW_HEADER_HEIGHT, None);
                stack.push(SectionId::Stats, STATS_HEIGHT, None);
                let rows = gallery_rows(content.expeditions.iter().map(|e| e.size));
                stack.push(SectionId::Gallery, GALLERY_ROW_HEIGHT * rows as f32, None);
            }
        }
        stack.push(SectionId::Footer, FOOTER_HEIGHT, None);

        Self {
            view,
            height: stack.y,
            sections: stack.sections,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Sections that fade in on scroll
    pub fn revealed_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.reveal.is_some())
    }

    /// Total document height
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Top of an anchored section, if this view has it
    pub fn anchor_offset(&self, anchor: Anchor) -> Option<f32> {
        let id = match anchor {
            Anchor::About => SectionId::AboutStory,
            Anchor::Experience => SectionId::Experience,
            Anchor::Skills => SectionId::Skills,
        };
        self.section(id).map(|s| s.bounds.y)
    }

    /// Scroll offset a request resolves to, clamped to the scrollable range
    ///
    /// An anchor missing from this view resolves to the top.
    pub fn scroll_target(&self, request: ScrollRequest, viewport_height: f32) -> f32 {
        let target = match request {
            ScrollRequest::Top => 0.0,
            ScrollRequest::ToAnchor(anchor) => match self.anchor_offset(anchor) {
                Some(y) => y,
                None => {
                    tracing::warn!(anchor = anchor.id(), view = %self.view, "anchor not in view");
                    0.0
                }
            },
        };
        target.clamp(0.0, (self.height - viewport_height).max(0.0))
    }
}

/// Rows used by gallery cards flowing into a fixed column grid
///
/// At least enough rows for every cell, and never fewer than the tallest card.
fn gallery_rows(sizes: impl Iterator<Item = ExpeditionSize>) -> usize {
    let mut cells = 0usize;
    let mut tallest = 0usize;
    for size in sizes {
        let span = size.grid_span();
        cells += usize::from(span.columns) * usize::from(span.rows);
        tallest = tallest.max(usize::from(span.rows));
    }
    cells.div_ceil(GALLERY_COLUMNS).max(tallest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled() -> Content {
        Content::bundled().unwrap()
    }

    #[test]
    fn test_home_sections_stack() {
        let layout = PageLayout::compute(View::Home, &bundled(), 1280.0, 800.0);
        let ids: Vec<SectionId> = layout.sections().iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                SectionId::Hero,
                SectionId::SummaryBar,
                SectionId::AboutStory,
                SectionId::AboutHighlights,
                SectionId::Experience,
                SectionId::Skills,
                SectionId::Footer,
            ]
        );

        let story = layout.section(SectionId::AboutStory).unwrap();
        let photos = layout.section(SectionId::AboutHighlights).unwrap();
        assert_eq!(story.bounds.y, 896.0);
        assert_eq!(photos.bounds.y, story.bounds.y);
        assert_eq!(story.reveal, Some(Duration::ZERO));
        assert_eq!(photos.reveal, Some(HIGHLIGHTS_DELAY));

        // Four timeline entries in the longer column
        let experience = layout.section(SectionId::Experience).unwrap();
        assert_eq!(experience.bounds.height, 200.0 + 4.0 * 260.0);
    }

    #[test]
    fn test_every_project_row_reveals() {
        let layout = PageLayout::compute(View::Projects, &bundled(), 1280.0, 800.0);
        let rows: Vec<SectionId> = layout.revealed_sections().map(|s| s.id).collect();
        assert_eq!(rows, (0..6).map(SectionId::ProjectRow).collect::<Vec<_>>());

        let first = layout.section(SectionId::ProjectRow(0)).unwrap();
        let second = layout.section(SectionId::ProjectRow(1)).unwrap();
        assert_eq!(second.bounds.y - first.bounds.bottom(), PROJECT_GAP);
    }

    #[test]
    fn test_anchor_targets() {
        let content = bundled();
        let home = PageLayout::compute(View::Home, &content, 1280.0, 800.0);
        let skills = home.anchor_offset(Anchor::Skills).unwrap();
        assert_eq!(
            home.scroll_target(ScrollRequest::ToAnchor(Anchor::Skills), 800.0),
            skills.min(home.height() - 800.0)
        );
        assert_eq!(home.scroll_target(ScrollRequest::Top, 800.0), 0.0);

        let outdoors = PageLayout::compute(View::Outdoors, &content, 1280.0, 800.0);
        assert_eq!(outdoors.anchor_offset(Anchor::Skills), None);
        assert_eq!(
            outdoors.scroll_target(ScrollRequest::ToAnchor(Anchor::Skills), 800.0),
            0.0
        );
    }

    #[test]
    fn test_gallery_rows() {
        use ExpeditionSize::*;
        assert_eq!(gallery_rows([Wide, Standard, Standard, Wide, Standard].into_iter()), 3);
        // A tall card needs two rows however few cells it shares them with
        assert_eq!(gallery_rows([Tall, Standard].into_iter()), 2);
        assert_eq!(gallery_rows([Tall].into_iter()), 2);
        assert_eq!(gallery_rows([Tall, Tall, Tall, Standard].into_iter()), 3);
        assert_eq!(gallery_rows(std::iter::empty()), 0);
    }
}
