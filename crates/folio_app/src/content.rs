//! Static page content
//!
//! Everything the page displays is data: the profile, the hero phrases, the
//! education and experience timelines, projects, expeditions and skills.
//! A default document is bundled with the crate; [`Content::load`] reads an
//! alternative one.

use crate::error::{ContentError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const BUNDLED: &str = include_str!("../content/portfolio.toml");

/// Complete page content
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Content {
    pub profile: Profile,
    /// Hero typewriter phrases. May be empty.
    #[serde(default)]
    pub phrases: Vec<String>,
    #[serde(default)]
    pub summary: Summary,
    #[serde(default)]
    pub education: Vec<Job>,
    #[serde(default)]
    pub experience: Vec<Job>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub expeditions: Vec<Expedition>,
    #[serde(default)]
    pub skills: Vec<SkillCategory>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    pub name: String,
    /// Short wordmark shown in the navigation bar
    #[serde(default)]
    pub brand: Option<String>,
    pub headline: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub hero_image: Option<String>,
    #[serde(default)]
    pub about_title: Option<String>,
    #[serde(default)]
    pub about: Vec<String>,
    #[serde(default)]
    pub footer: Option<String>,
}

impl Profile {
    pub fn brand(&self) -> &str {
        self.brand.as_deref().unwrap_or(&self.name)
    }
}

/// The "two minute read" modal
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Summary {
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub competencies: Option<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// One entry of the education or experience timeline
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Job {
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub location: Option<String>,
    pub dates: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Project {
    pub title: String,
    pub category: String,
    pub overview: String,
    #[serde(default)]
    pub contributions: Vec<String>,
    #[serde(default)]
    pub results: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Shows the "updates coming soon" badge
    #[serde(default)]
    pub early_stage: bool,
}

/// Number of tags shown on a project row; the modal shows all of them
pub const PREVIEW_TAGS: usize = 3;

impl Project {
    pub fn preview_tags(&self) -> &[String] {
        &self.tags[..self.tags.len().min(PREVIEW_TAGS)]
    }
}

/// Which side of a project row the image sits on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowLayout {
    ImageLeft,
    ImageRight,
}

impl RowLayout {
    /// Rows alternate, starting with the image on the left
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            RowLayout::ImageLeft
        } else {
            RowLayout::ImageRight
        }
    }
}

/// Headline number on the expeditions page
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpeditionSize {
    #[default]
    Standard,
    Wide,
    Tall,
}

/// Cells a gallery card occupies
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpan {
    pub columns: u8,
    pub rows: u8,
}

impl ExpeditionSize {
    pub fn grid_span(self) -> GridSpan {
        match self {
            ExpeditionSize::Standard => GridSpan { columns: 1, rows: 1 },
            ExpeditionSize::Wide => GridSpan { columns: 2, rows: 1 },
            ExpeditionSize::Tall => GridSpan { columns: 1, rows: 2 },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Expedition {
    pub title: String,
    pub sub: String,
    pub location: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub size: ExpeditionSize,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SkillCategory {
    pub title: String,
    #[serde(default)]
    pub items: Vec<Skill>,
}

/// Top of the skill scale
pub const SKILL_SCALE: f32 = 3.0;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Skill {
    pub name: String,
    /// 0 to 3: introduced, proficient, expert
    pub level: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SkillTier {
    Introduced,
    Proficient,
    Expert,
}

impl SkillTier {
    pub fn label(self) -> &'static str {
        match self {
            SkillTier::Introduced => "Introduced",
            SkillTier::Proficient => "Proficient",
            SkillTier::Expert => "Expert",
        }
    }
}

impl Skill {
    /// Bar fill, capped at 100
    pub fn percentage(&self) -> f32 {
        (self.level / SKILL_SCALE * 100.0).min(100.0)
    }

    /// The third of the scale the level falls in
    pub fn tier(&self) -> SkillTier {
        if self.level < 1.0 {
            SkillTier::Introduced
        } else if self.level < 2.0 {
            SkillTier::Proficient
        } else {
            SkillTier::Expert
        }
    }
}

impl Content {
    /// The content shipped with the crate
    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(BUNDLED)
    }

    /// Parse and validate a content document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let content: Content = toml::from_str(source)?;
        content.validate()?;
        Ok(content)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Reject content that would render broken
    ///
    /// An empty phrase list is accepted: the hero typewriter stays blank.
    pub fn validate(&self) -> Result<()> {
        if self.profile.name.trim().is_empty() {
            return Err(ContentError::invalid("profile.name is empty"));
        }
        if self.phrases.is_empty() {
            tracing::warn!("no hero phrases, typewriter will stay blank");
        }

        for (i, job) in self.education.iter().chain(&self.experience).enumerate() {
            if job.company.trim().is_empty() {
                return Err(ContentError::invalid(format!("timeline entry {i} has no company")));
            }
        }
        for (i, project) in self.projects.iter().enumerate() {
            if project.title.trim().is_empty() {
                return Err(ContentError::invalid(format!("project {i} has no title")));
            }
        }
        for (i, expedition) in self.expeditions.iter().enumerate() {
            if expedition.title.trim().is_empty() {
                return Err(ContentError::invalid(format!("expedition {i} has no title")));
            }
        }
        for category in &self.skills {
            if category.title.trim().is_empty() {
                return Err(ContentError::invalid("skill category has no title"));
            }
            for skill in &category.items {
                if !skill.level.is_finite() || skill.level < 0.0 {
                    return Err(ContentError::invalid(format!(
                        "skill '{}' has invalid level {}",
                        skill.name, skill.level
                    )));
                }
                if skill.level > SKILL_SCALE {
                    tracing::warn!(skill = %skill.name, level = skill.level, "skill level above scale, bar will be capped");
                }
            }
        }
        Ok(())
    }

    pub fn project(&self, index: usize) -> Option<&Project> {
        self.projects.get(index)
    }
}
