use folio_app::{
    Anchor, Content, FolioConfig, NavTarget, NavTone, Portfolio, SectionId, View,
};
use folio_core::{TimerScheduler, UnavailableViewport, Viewport};
use folio_motion::{Presentation, TypewriterFrame};
use std::sync::Arc;
use std::time::Duration;

const WIDTH: f32 = 1280.0;
const HEIGHT: f32 = 800.0;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn portfolio(scheduler: &TimerScheduler, viewport: &Viewport) -> Portfolio {
    Portfolio::new(
        Content::bundled().unwrap(),
        FolioConfig::default(),
        scheduler.handle(),
        viewport.clone(),
        WIDTH,
    )
}

#[test]
fn test_hero_types_first_phrase() {
    let scheduler = TimerScheduler::new();
    let viewport = Viewport::new(HEIGHT);
    let portfolio = portfolio(&scheduler, &viewport);

    assert_eq!(portfolio.hero_frame().unwrap().text, "");
    scheduler.advance(ms(500));
    assert_eq!(portfolio.hero_frame().unwrap().text, "Photo");
    scheduler.advance(ms(700));
    assert_eq!(portfolio.hero_frame().unwrap().text, "Photographer");

    // Still holding two seconds later, then deleting
    scheduler.advance(ms(2000));
    assert_eq!(portfolio.hero_frame().unwrap().text, "Photographer");
    scheduler.advance(ms(200));
    assert_eq!(portfolio.hero_frame().unwrap().text, "Photograph");
}

#[test]
fn test_scroll_pass_reveals_monotonically() {
    let scheduler = TimerScheduler::new();
    let viewport = Viewport::new(HEIGHT);
    let mut portfolio = portfolio(&scheduler, &viewport);

    assert_eq!(portfolio.is_revealed(SectionId::AboutStory), Some(false));
    assert_eq!(portfolio.is_revealed(SectionId::AboutHighlights), Some(false));
    assert_eq!(viewport.observation_count(), 2);
    // Sections without a reveal are always shown
    assert_eq!(portfolio.is_revealed(SectionId::Hero), Some(true));

    portfolio.scroll_to(300.0);
    assert!(portfolio.page().is_scrolled());
    assert_eq!(portfolio.page().parallax_offset(), 150.0);
    assert_eq!(portfolio.is_revealed(SectionId::AboutStory), Some(true));
    assert_eq!(viewport.observation_count(), 0);

    portfolio.scroll_to(0.0);
    assert!(!portfolio.page().is_scrolled());
    assert_eq!(portfolio.is_revealed(SectionId::AboutStory), Some(true));
    assert_eq!(portfolio.is_revealed(SectionId::AboutHighlights), Some(true));
}

#[test]
fn test_highlights_fade_in_behind_story() {
    let scheduler = TimerScheduler::new();
    let viewport = Viewport::new(HEIGHT);
    let mut portfolio = portfolio(&scheduler, &viewport);

    scheduler.advance(ms(1000));
    portfolio.scroll_to(400.0);

    scheduler.advance(ms(200));
    let story = portfolio.section(SectionId::AboutStory).unwrap();
    let photos = portfolio.section(SectionId::AboutHighlights).unwrap();
    assert!(story.presentation.opacity > 0.0);
    assert_eq!(photos.presentation.opacity, 0.0);
    assert_eq!(photos.presentation.translate_y, 40.0);

    scheduler.advance(ms(1000));
    let story = portfolio.section(SectionId::AboutStory).unwrap();
    assert_eq!(story.presentation, Presentation::VISIBLE);
    let photos = portfolio.section(SectionId::AboutHighlights).unwrap();
    assert_eq!(photos.presentation, Presentation::VISIBLE);
}

#[test]
fn test_navigation_remounts_view() {
    let scheduler = TimerScheduler::new();
    let viewport = Viewport::new(HEIGHT);
    let mut portfolio = portfolio(&scheduler, &viewport);
    scheduler.advance(ms(150));

    portfolio.page_mut().toggle_menu();
    portfolio.navigate(NavTarget::view(View::Projects));
    assert_eq!(portfolio.view(), View::Projects);
    assert!(!portfolio.page().is_menu_open());

    // Hero torn down with all its timers; only the settle timer is left
    assert!(portfolio.hero_frame().is_none());
    assert_eq!(scheduler.pending_count(), 1);

    // First row is already on screen, the other five wait
    assert_eq!(portfolio.is_revealed(SectionId::ProjectRow(0)), Some(true));
    assert_eq!(portfolio.is_revealed(SectionId::ProjectRow(1)), Some(false));
    assert_eq!(viewport.observation_count(), 5);
    assert_eq!(viewport.element_count(), portfolio.layout().sections().len());

    scheduler.advance(ms(100));
    assert_eq!(portfolio.apply_scroll_requests(), 1);
    assert_eq!(viewport.scroll_y(), 0.0);
}

#[test]
fn test_anchor_navigation_scrolls_after_settle() {
    let scheduler = TimerScheduler::new();
    let viewport = Viewport::new(HEIGHT);
    let mut portfolio = portfolio(&scheduler, &viewport);

    portfolio.navigate(NavTarget::view(View::Outdoors));
    scheduler.advance(ms(100));
    portfolio.apply_scroll_requests();

    portfolio.navigate(NavTarget::anchor(View::Home, Anchor::Skills));
    assert_eq!(portfolio.apply_scroll_requests(), 0);
    scheduler.advance(ms(100));
    assert_eq!(portfolio.apply_scroll_requests(), 1);

    let skills = portfolio.layout().anchor_offset(Anchor::Skills).unwrap();
    assert_eq!(viewport.scroll_y(), skills);
    assert_eq!(portfolio.page().nav_tone(), NavTone::Dark);

    // Jumping past the about section does not reveal it
    assert_eq!(portfolio.is_revealed(SectionId::AboutStory), Some(false));
}

#[test]
fn test_project_modal_bounds() {
    let scheduler = TimerScheduler::new();
    let viewport = Viewport::new(HEIGHT);
    let mut portfolio = portfolio(&scheduler, &viewport);
    let count = portfolio.content().projects.len();

    assert!(portfolio.page_mut().open_project(count - 1));
    assert!(!portfolio.page_mut().open_project(count));
    assert_eq!(portfolio.page().open_project_index(), Some(count - 1));
}

#[test]
fn test_fails_open_without_observer() {
    let scheduler = TimerScheduler::new();
    let viewport = Viewport::new(HEIGHT);
    let portfolio = Portfolio::with_source(
        Content::bundled().unwrap(),
        FolioConfig::default(),
        scheduler.handle(),
        viewport.clone(),
        Arc::new(UnavailableViewport),
        WIDTH,
    );

    assert!(portfolio.sections().iter().all(|s| s.visible));
    assert_eq!(viewport.observation_count(), 0);

    scheduler.advance(ms(1200));
    let photos = portfolio.section(SectionId::AboutHighlights).unwrap();
    assert_eq!(photos.presentation, Presentation::VISIBLE);
}

#[test]
fn test_empty_phrases_leave_hero_blank() {
    let content = Content::from_toml_str(
        r#"
        phrases = []

        [profile]
        name = "Sam"
        headline = "Engineer"
        "#,
    )
    .unwrap();
    let scheduler = TimerScheduler::new();
    let viewport = Viewport::new(HEIGHT);
    let portfolio = Portfolio::new(
        content,
        FolioConfig::default(),
        scheduler.handle(),
        viewport,
        WIDTH,
    );

    assert_eq!(scheduler.pending_count(), 0);
    scheduler.advance(ms(10_000));
    assert_eq!(
        portfolio.hero_frame(),
        Some(TypewriterFrame {
            text: String::new(),
            caret_visible: false,
        })
    );
}

#[test]
fn test_resize_moves_sections() {
    let scheduler = TimerScheduler::new();
    let viewport = Viewport::new(HEIGHT);
    let mut portfolio = portfolio(&scheduler, &viewport);

    // The hero fills the window, so a shorter window pulls the about row up
    portfolio.resize(WIDTH, 600.0);
    let story = portfolio.layout().section(SectionId::AboutStory).unwrap();
    assert_eq!(story.bounds.y, 696.0);
    assert_eq!(portfolio.is_revealed(SectionId::AboutStory), Some(false));

    portfolio.scroll_to(100.0);
    assert_eq!(portfolio.is_revealed(SectionId::AboutStory), Some(true));
}

#[test]
fn test_growing_window_does_not_reveal_offscreen_sections() {
    let scheduler = TimerScheduler::new();
    let viewport = Viewport::new(HEIGHT);
    let mut portfolio = portfolio(&scheduler, &viewport);

    // The hero grows with the window and keeps the about row below the fold
    portfolio.resize(WIDTH, 1000.0);
    let story = portfolio.layout().section(SectionId::AboutStory).unwrap();
    assert_eq!(story.bounds.y, 1096.0);
    assert_eq!(viewport.height(), 1000.0);
    assert_eq!(portfolio.is_revealed(SectionId::AboutStory), Some(false));
    assert_eq!(portfolio.is_revealed(SectionId::AboutHighlights), Some(false));
    assert_eq!(viewport.observation_count(), 2);

    portfolio.scroll_to(200.0);
    assert_eq!(portfolio.is_revealed(SectionId::AboutStory), Some(true));
}

#[test]
fn test_drop_leaves_nothing_behind() {
    let scheduler = TimerScheduler::new();
    let viewport = Viewport::new(HEIGHT);
    let mut portfolio = portfolio(&scheduler, &viewport);
    portfolio.navigate(NavTarget::view(View::Projects));
    scheduler.advance(ms(50));

    drop(portfolio);
    assert_eq!(viewport.element_count(), 0);
    assert_eq!(viewport.observation_count(), 0);
    assert_eq!(scheduler.pending_count(), 0);
}
