//! Fixed tuning constants for the particle field.
//!
//! Two presets exist: [`FieldConfig::rich`] (pointer attraction, damped
//! bounces, lifetime respawn) and [`FieldConfig::simple`] (plain drifting
//! dots with exact reflection). The rich preset is the default.

use std::ops::Range;

/// Pointer attraction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction {
    /// Distance (logical px) inside which the pointer pulls particles.
    pub radius: f64,
    /// Scale applied to the normalised pull before it is added to velocity.
    pub strength: f64,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            radius: 100.0,
            strength: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    pub count: usize,
    pub radius: Range<f64>,
    /// Each velocity component is drawn from `-speed..speed`.
    pub speed: f64,
    pub opacity: Range<f64>,
    /// Frames a particle lives before it is respawned in place.
    pub lifetime: Option<Range<u32>>,
    pub interaction: Option<Interaction>,
    /// Fraction of speed kept (and reversed) on an edge hit.
    pub damping: f64,
    pub color: (u8, u8, u8),
    /// Length of one simulation step in milliseconds.
    pub frame_ms: f64,
    /// Steps run at most per tick; backlog beyond this is dropped.
    pub max_steps_per_tick: u32,
}

impl FieldConfig {
    pub const RICH_COUNT: usize = 80;
    pub const SIMPLE_COUNT: usize = 60;

    pub fn rich() -> Self {
        Self {
            count: Self::RICH_COUNT,
            radius: 0.5..2.5,
            speed: 0.25,
            opacity: 0.3..0.8,
            lifetime: Some(50..150),
            interaction: Some(Interaction::default()),
            damping: 0.8,
            color: (255, 255, 255),
            frame_ms: 1000.0 / 60.0,
            max_steps_per_tick: 4,
        }
    }

    pub fn simple() -> Self {
        Self {
            count: Self::SIMPLE_COUNT,
            lifetime: None,
            interaction: None,
            damping: 1.0,
            ..Self::rich()
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// CSS `rgba(..)` fill for the given opacity.
    pub fn fill_style(&self, opacity: f64) -> String {
        let (r, g, b) = self.color;
        format!("rgba({r}, {g}, {b}, {opacity})")
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::rich()
    }
}
