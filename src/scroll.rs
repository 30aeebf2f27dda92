//! Cooperative auto-scroll while dragging near the viewport edge.

use std::time::Instant;

use crate::config::AutoScrollConfig;
use crate::geometry::{Point, Rect, Vector};

/// Emits at most one scroll step per configured interval.
///
/// Time is supplied by the caller, so the throttle is deterministic and
/// never blocks.
#[derive(Debug, Clone)]
pub struct AutoScroller {
    config: AutoScrollConfig,
    viewport: Option<Rect>,
    last_tick: Option<Instant>,
}

impl AutoScroller {
    pub fn new(config: AutoScrollConfig) -> Self {
        Self {
            config,
            viewport: None,
            last_tick: None,
        }
    }

    /// Visible area in view coordinates. Without one nothing scrolls.
    pub fn set_viewport(&mut self, viewport: Option<Rect>) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Option<Rect> {
        self.viewport
    }

    /// Forgets the last tick, e.g. when a manipulation ends.
    pub fn reset(&mut self) {
        self.last_tick = None;
    }

    /// Direction to scroll for a pointer at `position`, ignoring the
    /// throttle. Zero when the pointer is away from every edge.
    pub fn edge_direction(&self, position: Point) -> Vector {
        let Some(viewport) = self.viewport else {
            return Vector::ZERO;
        };
        let margin = self.config.margin();
        let step = self.config.step();
        let axis = |value: f32, low: f32, high: f32| {
            if value < low + margin {
                -step
            } else if value > high - margin {
                step
            } else {
                0.0
            }
        };
        Vector::new(
            axis(position.x, viewport.left(), viewport.right()),
            axis(position.y, viewport.top(), viewport.bottom()),
        )
    }

    /// Scroll delta to apply now, if the pointer is near an edge and the
    /// interval since the previous step has elapsed.
    pub fn tick(&mut self, position: Point, now: Instant) -> Option<Vector> {
        let direction = self.edge_direction(position);
        if direction.is_zero() {
            return None;
        }
        if let Some(last) = self.last_tick {
            if now.saturating_duration_since(last) < self.config.interval() {
                return None;
            }
        }
        self.last_tick = Some(now);
        Some(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn scroller() -> AutoScroller {
        let mut scroller = AutoScroller::new(AutoScrollConfig::default());
        scroller.set_viewport(Some(Rect::new(0.0, 0.0, 400.0, 300.0)));
        scroller
    }

    #[test]
    fn test_no_scroll_away_from_edges() {
        let mut scroller = scroller();
        assert_eq!(scroller.tick(Point::new(200.0, 150.0), Instant::now()), None);
    }

    #[test]
    fn test_scroll_direction_near_edges() {
        let scroller = scroller();
        assert_eq!(scroller.edge_direction(Point::new(5.0, 150.0)), Vector::new(-16.0, 0.0));
        assert_eq!(scroller.edge_direction(Point::new(395.0, 295.0)), Vector::new(16.0, 16.0));
    }

    #[test]
    fn test_throttle_limits_rate() {
        let mut scroller = scroller();
        let start = Instant::now();
        let edge = Point::new(5.0, 150.0);

        assert!(scroller.tick(edge, start).is_some());
        assert!(scroller.tick(edge, start + Duration::from_millis(10)).is_none());
        assert!(scroller.tick(edge, start + Duration::from_millis(60)).is_some());
    }

    #[test]
    fn test_no_viewport_no_scroll() {
        let mut scroller = AutoScroller::new(AutoScrollConfig::default());
        assert_eq!(scroller.tick(Point::new(0.0, 0.0), Instant::now()), None);
    }
}
