//! Which nav section is "current" while the page scrolls.

use crate::section::Section;

/// Visible fraction a section needs before it becomes active.
pub const ACTIVE_RATIO: f64 = 0.5;

#[derive(Clone, Debug)]
pub struct ScrollSpy {
    active: Section,
}

impl Default for ScrollSpy {
    fn default() -> Self {
        Self { active: Section::Home }
    }
}

impl ScrollSpy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Section {
        self.active
    }

    /// Feeds one intersection observation. Returns the new active section
    /// when it changed. Sections leaving the viewport never deactivate
    /// anything; the next one crossing the threshold takes over.
    pub fn observe(&mut self, anchor: &str, intersecting: bool, ratio: f64) -> Option<Section> {
        let section = Section::from_anchor(anchor)?;
        if !intersecting || ratio < ACTIVE_RATIO || section == self.active {
            return None;
        }
        self.active = section;
        Some(section)
    }

    /// Whether the nav link with this `href` should be highlighted.
    pub fn is_active_href(&self, href: &str) -> bool {
        Section::from_anchor(href) == Some(self.active)
    }
}
