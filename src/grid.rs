//! Snap-to-grid, applied only when a manipulation is committed.

use crate::config::GridConfig;
use crate::geometry::{Point, Rect, Size};

/// Round `value` to the nearest multiple of `spacing`.
///
/// A non-positive spacing leaves the value untouched.
pub fn snap_value(value: f32, spacing: f32) -> f32 {
    if spacing <= 0.0 {
        return value;
    }
    (value / spacing).round() * spacing
}

pub fn snap_point(p: Point, spacing: f32) -> Point {
    Point::new(snap_value(p.x, spacing), snap_value(p.y, spacing))
}

/// Grid snapping as configured for a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapper {
    enabled: bool,
    spacing: f32,
}

impl Snapper {
    pub fn new(enabled: bool, spacing: f32) -> Self {
        Self { enabled, spacing }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(config.snap(), config.size())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && self.spacing > 0.0
    }

    pub fn value(&self, value: f32) -> f32 {
        if self.is_enabled() {
            snap_value(value, self.spacing)
        } else {
            value
        }
    }

    pub fn point(&self, p: Point) -> Point {
        if self.is_enabled() {
            snap_point(p, self.spacing)
        } else {
            p
        }
    }

    /// Moves `rect` so its top-left corner sits on the grid; size is kept.
    pub fn rect_position(&self, rect: Rect) -> Rect {
        let corner = self.point(rect.top_left());
        Rect::new(corner.x, corner.y, rect.width, rect.height)
    }

    /// Minimum symbol size: one grid cell while snapping, else `format_min`.
    pub fn minimum_size(&self, format_min: Size) -> Size {
        if self.is_enabled() {
            Size::new(self.spacing, self.spacing)
        } else {
            format_min
        }
    }
}
