//! Page configuration
//!
//! Timing and tuning knobs, read from a TOML file. Every field has a
//! default, so an empty document (or no file at all) yields the stock page:
//!
//! ```toml
//! [typewriter]
//! type_delay_ms = 100
//! delete_delay_ms = 50
//! pause_ms = 2000
//! blink_interval_ms = 500
//!
//! [reveal]
//! duration_ms = 1000
//! offset_px = 40.0
//! hidden_opacity = 0.0
//!
//! [nav]
//! scrolled_threshold_px = 50.0
//! parallax_factor = 0.5
//! scroll_settle_ms = 100
//! ```

use crate::error::{ContentError, Result};
use folio_motion::{RevealStyle, TypewriterTiming};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Complete page configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub typewriter: TypewriterConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub nav: NavConfig,
}

/// Hero typewriter timing
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TypewriterConfig {
    #[serde(default = "default_type_delay")]
    pub type_delay_ms: u64,
    #[serde(default = "default_delete_delay")]
    pub delete_delay_ms: u64,
    /// Hold on a fully typed phrase
    #[serde(default = "default_pause")]
    pub pause_ms: u64,
    /// Caret toggle interval, 0 for a steady caret
    #[serde(default = "default_blink_interval")]
    pub blink_interval_ms: u64,
}

fn default_type_delay() -> u64 {
    100
}

fn default_delete_delay() -> u64 {
    50
}

fn default_pause() -> u64 {
    2000
}

fn default_blink_interval() -> u64 {
    500
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            type_delay_ms: default_type_delay(),
            delete_delay_ms: default_delete_delay(),
            pause_ms: default_pause(),
            blink_interval_ms: default_blink_interval(),
        }
    }
}

impl TypewriterConfig {
    pub fn timing(&self) -> TypewriterTiming {
        TypewriterTiming {
            type_delay: Duration::from_millis(self.type_delay_ms),
            delete_delay: Duration::from_millis(self.delete_delay_ms),
            pause: Duration::from_millis(self.pause_ms),
            blink_interval: Duration::from_millis(self.blink_interval_ms),
        }
    }
}

/// Reveal transition styling
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RevealConfig {
    #[serde(default = "default_reveal_duration")]
    pub duration_ms: u64,
    #[serde(default = "default_offset")]
    pub offset_px: f32,
    #[serde(default)]
    pub hidden_opacity: f32,
}

fn default_reveal_duration() -> u64 {
    1000
}

fn default_offset() -> f32 {
    40.0
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_reveal_duration(),
            offset_px: default_offset(),
            hidden_opacity: 0.0,
        }
    }
}

impl RevealConfig {
    /// Style with no entry delay; sections add their own
    pub fn style(&self) -> RevealStyle {
        RevealStyle {
            duration: Duration::from_millis(self.duration_ms),
            delay: Duration::ZERO,
            offset_px: self.offset_px,
            hidden_opacity: self.hidden_opacity,
        }
    }
}

/// Navigation bar and scroll behaviour
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NavConfig {
    /// Scroll offset past which the bar switches to its solid style
    #[serde(default = "default_scrolled_threshold")]
    pub scrolled_threshold_px: f32,
    /// Hero background offset per pixel scrolled
    #[serde(default = "default_parallax_factor")]
    pub parallax_factor: f32,
    /// Wait after a view change before scrolling, so the new view can lay out
    #[serde(default = "default_scroll_settle")]
    pub scroll_settle_ms: u64,
}

fn default_scrolled_threshold() -> f32 {
    50.0
}

fn default_parallax_factor() -> f32 {
    0.5
}

fn default_scroll_settle() -> u64 {
    100
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold_px: default_scrolled_threshold(),
            parallax_factor: default_parallax_factor(),
            scroll_settle_ms: default_scroll_settle(),
        }
    }
}

impl NavConfig {
    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }
}

impl FolioConfig {
    /// Parse and validate a configuration document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: FolioConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Reject values the components cannot run with
    pub fn validate(&self) -> Result<()> {
        let typewriter = &self.typewriter;
        if typewriter.type_delay_ms == 0 || typewriter.delete_delay_ms == 0 {
            return Err(ContentError::invalid(
                "typewriter.type_delay_ms and typewriter.delete_delay_ms must be positive",
            ));
        }

        let reveal = &self.reveal;
        if !reveal.offset_px.is_finite() {
            return Err(ContentError::invalid("reveal.offset_px must be finite"));
        }
        if !(0.0..=1.0).contains(&reveal.hidden_opacity) {
            return Err(ContentError::invalid(
                "reveal.hidden_opacity must be between 0 and 1",
            ));
        }

        let nav = &self.nav;
        if !nav.scrolled_threshold_px.is_finite() || nav.scrolled_threshold_px < 0.0 {
            return Err(ContentError::invalid(
                "nav.scrolled_threshold_px must be a non-negative number",
            ));
        }
        if !nav.parallax_factor.is_finite() {
            return Err(ContentError::invalid("nav.parallax_factor must be finite"));
        }
        Ok(())
    }
}
