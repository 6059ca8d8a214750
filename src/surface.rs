//! Drawing seam between the field and whatever raster it paints on.

use glam::DVec2;

use crate::particle::Bounds;

/// A 2D raster the field can paint discs onto.
pub trait Surface {
    fn clear(&mut self, bounds: Bounds);
    fn fill_circle(&mut self, center: DVec2, radius: f64, fill: &str);
}

/// Rendered box of the host element plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub css_width: f64,
    pub css_height: f64,
    pub pixel_ratio: f64,
}

impl SurfaceSize {
    pub fn new(css_width: f64, css_height: f64, pixel_ratio: f64) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() {
            pixel_ratio.max(1.0)
        } else {
            1.0
        };
        Self {
            css_width: css_width.max(0.0),
            css_height: css_height.max(0.0),
            pixel_ratio,
        }
    }

    /// Backing store dimensions in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.css_width * self.pixel_ratio).round() as u32,
            (self.css_height * self.pixel_ratio).round() as u32,
        )
    }

    /// Simulation bounds, in CSS pixels.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.css_width, self.css_height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Bounds),
    Circle { center: DVec2, radius: f64, fill: String },
}

/// Surface that only remembers what it was asked to draw.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn circles(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Circle { .. }))
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, bounds: Bounds) {
        self.calls.push(DrawCall::Clear(bounds));
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, fill: &str) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            fill: fill.to_owned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_never_below_one() {
        assert_eq!(SurfaceSize::new(10.0, 10.0, 0.5).pixel_ratio, 1.0);
        assert_eq!(SurfaceSize::new(10.0, 10.0, f64::NAN).pixel_ratio, 1.0);
    }

    #[test]
    fn backing_size_scales_by_ratio() {
        let size = SurfaceSize::new(400.0, 300.0, 2.0);
        assert_eq!(size.backing_size(), (800, 600));
        assert_eq!(size.bounds(), Bounds::new(400.0, 300.0));
    }
}
