//! Folio Page Model
//!
//! The portfolio page around the motion components:
//!
//! - [`content`]: profile, hero phrases, timelines, projects, expeditions
//!   and skills, loaded from TOML
//! - [`config`]: timing and tuning for the components and the nav bar
//! - [`nav`], [`page`], [`scroll`]: view switching, menu and modal flags,
//!   scroll-driven chrome
//! - [`layout`]: section bounds per view
//! - [`portfolio`]: everything assembled, mounting a hero [`Typewriter`]
//!   and section [`Reveal`]s for the current view
//!
//! # Example
//!
//! ```rust
//! use folio_app::{Content, FolioConfig, Portfolio, SectionId};
//! use folio_core::{TimerScheduler, Viewport};
//!
//! let scheduler = TimerScheduler::new();
//! let viewport = Viewport::new(800.0);
//! let mut portfolio = Portfolio::new(
//!     Content::bundled().unwrap(),
//!     FolioConfig::default(),
//!     scheduler.handle(),
//!     viewport,
//!     1280.0,
//! );
//!
//! assert_eq!(portfolio.is_revealed(SectionId::AboutStory), Some(false));
//! portfolio.scroll_to(600.0);
//! assert_eq!(portfolio.is_revealed(SectionId::AboutStory), Some(true));
//! ```
//!
//! [`Typewriter`]: folio_motion::Typewriter
//! [`Reveal`]: folio_motion::Reveal

pub mod config;
pub mod content;
pub mod error;
pub mod layout;
pub mod nav;
pub mod page;
pub mod portfolio;
pub mod scroll;

pub use config::{FolioConfig, NavConfig, RevealConfig, TypewriterConfig};
pub use content::{Content, Expedition, ExpeditionSize, Job, Project, Skill, SkillCategory};
pub use error::{ContentError, Result};
pub use layout::{PageLayout, Section, SectionId};
pub use nav::{Anchor, NavItem, NavTarget, View};
pub use page::{PageState, ScrollRequest};
pub use portfolio::{Portfolio, SectionStatus};
pub use scroll::{NavTone, ScrollTracker};
