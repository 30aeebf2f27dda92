//! Geometric primitives shared by the manipulation and layout code.
//!
//! Everything is expressed in `f32` world coordinates (the same unit the UI
//! layer reports), with `y` growing downwards.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Tolerance used when comparing computed coordinates.
pub const EPSILON: f32 = 1e-4;

/// A position in world or view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (other - self).length()
    }

    /// Coordinate along the given axis.
    pub fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Returns a copy with the coordinate along `axis` replaced.
    pub fn with_along(self, axis: Axis, value: f32) -> Self {
        match axis {
            Axis::Horizontal => Point::new(value, self.y),
            Axis::Vertical => Point::new(self.x, value),
        }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn approx_eq(self, other: Point) -> bool {
        (self.x - other.x).abs() <= EPSILON && (self.y - other.y).abs() <= EPSILON
    }
}

/// A displacement between two points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub dx: f32,
    pub dy: f32,
}

impl Vector {
    pub const ZERO: Vector = Vector { dx: 0.0, dy: 0.0 };

    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    pub fn length(self) -> f32 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    pub fn is_zero(self) -> bool {
        self.dx.abs() <= EPSILON && self.dy.abs() <= EPSILON
    }

    pub fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.dx,
            Axis::Vertical => self.dy,
        }
    }
}

impl Add<Vector> for Point {
    type Output = Point;
    fn add(self, v: Vector) -> Point {
        Point::new(self.x + v.dx, self.y + v.dy)
    }
}

impl AddAssign<Vector> for Point {
    fn add_assign(&mut self, v: Vector) {
        self.x += v.dx;
        self.y += v.dy;
    }
}

impl Sub<Vector> for Point {
    type Output = Point;
    fn sub(self, v: Vector) -> Point {
        Point::new(self.x - v.dx, self.y - v.dy)
    }
}

impl Sub<Point> for Point {
    type Output = Vector;
    fn sub(self, other: Point) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, other: Vector) -> Vector {
        Vector::new(self.dx + other.dx, self.dy + other.dy)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, other: Vector) {
        self.dx += other.dx;
        self.dy += other.dy;
    }
}

impl Mul<f32> for Vector {
    type Output = Vector;
    fn mul(self, factor: f32) -> Vector {
        Vector::new(self.dx * factor, self.dy * factor)
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        Vector::new(-self.dx, -self.dy)
    }
}

/// Width and height of a visual.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// The two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn perpendicular(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Axis-aligned rectangle stored as top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_center(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width * 0.5,
            center.y - size.height * 0.5,
            size.width,
            size.height,
        )
    }

    /// Smallest rectangle containing both points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn translate(&self, v: Vector) -> Rect {
        Rect::new(self.x + v.dx, self.y + v.dy, self.width, self.height)
    }

    pub fn with_center(&self, center: Point) -> Rect {
        Rect::from_center(center, self.size())
    }

    pub fn inflate(&self, amount: f32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// Bounding box of a set of points, or `None` when empty.
    pub fn bounding<I>(points: I) -> Option<Rect>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        Some(Rect::from_corners(min, max))
    }
}

/// Eight-way position of a point relative to a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    /// The point lies within the rectangle.
    Inside,
}

impl Quadrant {
    pub const ALL: [Quadrant; 8] = [
        Quadrant::Down,
        Quadrant::Right,
        Quadrant::Left,
        Quadrant::Up,
        Quadrant::DownRight,
        Quadrant::DownLeft,
        Quadrant::UpRight,
        Quadrant::UpLeft,
    ];

    /// Classifies `p` against the bands formed by the edges of `rect`.
    pub fn of(p: Point, rect: &Rect) -> Quadrant {
        let col = if p.x < rect.left() {
            -1
        } else if p.x > rect.right() {
            1
        } else {
            0
        };
        let row = if p.y < rect.top() {
            -1
        } else if p.y > rect.bottom() {
            1
        } else {
            0
        };
        Quadrant::from_direction(col, row)
    }

    fn from_direction(col: i8, row: i8) -> Quadrant {
        match (col, row) {
            (0, -1) => Quadrant::Up,
            (0, 1) => Quadrant::Down,
            (-1, 0) => Quadrant::Left,
            (1, 0) => Quadrant::Right,
            (-1, -1) => Quadrant::UpLeft,
            (1, -1) => Quadrant::UpRight,
            (-1, 1) => Quadrant::DownLeft,
            (1, 1) => Quadrant::DownRight,
            _ => Quadrant::Inside,
        }
    }

    /// Unit direction `(col, row)` of the quadrant.
    pub fn direction(self) -> (i8, i8) {
        match self {
            Quadrant::Up => (0, -1),
            Quadrant::Down => (0, 1),
            Quadrant::Left => (-1, 0),
            Quadrant::Right => (1, 0),
            Quadrant::UpLeft => (-1, -1),
            Quadrant::UpRight => (1, -1),
            Quadrant::DownLeft => (-1, 1),
            Quadrant::DownRight => (1, 1),
            Quadrant::Inside => (0, 0),
        }
    }

    pub fn opposite(self) -> Quadrant {
        let (col, row) = self.direction();
        Quadrant::from_direction(-col, -row)
    }
}

/// Point where the segment from `center` toward `toward` leaves `rect`.
///
/// `center` must lie inside the rectangle. Returns `None` when `toward` is
/// inside the rectangle too, so there is no crossing.
pub fn rect_outline_intersection(rect: &Rect, center: Point, toward: Point) -> Option<Point> {
    let d = toward - center;
    let tx = if d.dx > 0.0 {
        (rect.right() - center.x) / d.dx
    } else if d.dx < 0.0 {
        (rect.left() - center.x) / d.dx
    } else {
        f32::INFINITY
    };
    let ty = if d.dy > 0.0 {
        (rect.bottom() - center.y) / d.dy
    } else if d.dy < 0.0 {
        (rect.top() - center.y) / d.dy
    } else {
        f32::INFINITY
    };
    let t = tx.min(ty);
    if !t.is_finite() || t > 1.0 {
        return None;
    }
    Some(center + d * t)
}

/// Point where the segment from the ellipse center toward `toward` crosses
/// the ellipse inscribed in `rect`.
pub fn ellipse_outline_intersection(rect: &Rect, toward: Point) -> Option<Point> {
    let center = rect.center();
    let rx = rect.width * 0.5;
    let ry = rect.height * 0.5;
    if rx <= EPSILON || ry <= EPSILON {
        return None;
    }
    let d = toward - center;
    let norm = ((d.dx / rx).powi(2) + (d.dy / ry).powi(2)).sqrt();
    if norm <= 1.0 {
        return None;
    }
    Some(center + d * (1.0 / norm))
}

/// Shortest distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let len_sq = ab.dx * ab.dx + ab.dy * ab.dy;
    if len_sq <= EPSILON * EPSILON {
        return p.distance(a);
    }
    let ap = p - a;
    let t = ((ap.dx * ab.dx + ap.dy * ab.dy) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    // ========================================================================
    // Rect
    // ========================================================================

    #[test]
    fn test_rect_from_center_round_trips() {
        let rect = Rect::from_center(Point::new(100.0, 100.0), Size::new(50.0, 30.0));
        assert_eq!(rect, Rect::new(75.0, 85.0, 50.0, 30.0));
        assert_eq!(rect.center(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_rect_from_corners_normalizes() {
        let rect = Rect::from_corners(Point::new(10.0, 40.0), Point::new(0.0, 20.0));
        assert_eq!(rect, Rect::new(0.0, 20.0, 10.0, 20.0));
    }

    #[test]
    fn test_rect_intersects_is_exclusive_on_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_bounding_of_empty_is_none() {
        assert!(Rect::bounding(Vec::<Point>::new()).is_none());
    }

    // ========================================================================
    // Quadrant
    // ========================================================================

    #[test]
    fn test_quadrant_classification() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(Quadrant::of(Point::new(5.0, -5.0), &rect), Quadrant::Up);
        assert_eq!(Quadrant::of(Point::new(15.0, 15.0), &rect), Quadrant::DownRight);
        assert_eq!(Quadrant::of(Point::new(-1.0, 5.0), &rect), Quadrant::Left);
        assert_eq!(Quadrant::of(Point::new(5.0, 5.0), &rect), Quadrant::Inside);
    }

    #[test]
    fn test_quadrant_opposite() {
        assert_eq!(Quadrant::Up.opposite(), Quadrant::Down);
        assert_eq!(Quadrant::UpRight.opposite(), Quadrant::DownLeft);
        assert_eq!(Quadrant::Inside.opposite(), Quadrant::Inside);
    }

    // ========================================================================
    // Outline intersections
    // ========================================================================

    #[test]
    fn test_rect_outline_intersection_horizontal() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let hit = rect_outline_intersection(&rect, rect.center(), Point::new(300.0, 25.0))
            .expect("segment leaves the rect");
        assert!(approx_eq!(f32, hit.x, 100.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, hit.y, 25.0, epsilon = 1e-3));
    }

    #[test]
    fn test_rect_outline_intersection_diagonal_hits_nearest_edge() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        // Steep direction leaves through the bottom edge first
        let hit = rect_outline_intersection(&rect, rect.center(), Point::new(58.0, 125.0))
            .expect("segment leaves the rect");
        assert!(approx_eq!(f32, hit.y, 50.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, hit.x, 52.0, epsilon = 1e-3));
    }

    #[test]
    fn test_rect_outline_intersection_inside_target_is_none() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(rect_outline_intersection(&rect, rect.center(), Point::new(60.0, 30.0)).is_none());
        assert!(rect_outline_intersection(&rect, rect.center(), rect.center()).is_none());
    }

    #[test]
    fn test_ellipse_outline_intersection() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let hit = ellipse_outline_intersection(&rect, Point::new(50.0, 200.0))
            .expect("segment leaves the ellipse");
        assert!(approx_eq!(f32, hit.x, 50.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, hit.y, 50.0, epsilon = 1e-3));
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!(approx_eq!(f32, distance_to_segment(Point::new(5.0, 3.0), a, b), 3.0));
        assert!(approx_eq!(f32, distance_to_segment(Point::new(-4.0, 3.0), a, b), 5.0));
        // Degenerate segment behaves like a point
        assert!(approx_eq!(f32, distance_to_segment(Point::new(3.0, 4.0), a, a), 5.0));
    }
}
