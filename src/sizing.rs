//! Breakpoint-based sprite sizing.

use crate::config::BuddyConfig;
use crate::env::Viewport;
use crate::motion::MotionController;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizingPolicy {
    base_size: f64,
    narrow_breakpoint: f64,
    narrow_scale: f64,
    wide_scale: f64,
}

impl SizingPolicy {
    pub fn from_config(config: &BuddyConfig) -> Self {
        Self {
            base_size: config.base_size,
            narrow_breakpoint: config.narrow_breakpoint,
            narrow_scale: config.narrow_scale,
            wide_scale: config.wide_scale,
        }
    }

    /// Sprite edge for a viewport; narrow screens get the smaller multiplier.
    pub fn size_for(&self, viewport: Viewport) -> f64 {
        if viewport.width < self.narrow_breakpoint {
            self.base_size * self.narrow_scale
        } else {
            self.base_size * self.wide_scale
        }
    }

    /// Run on mount and on every `resize`: resizes the sprite and re-clamps it.
    pub fn apply(&self, ctl: &mut MotionController, viewport: Viewport) {
        ctl.set_size(self.size_for(viewport), viewport);
    }
}
