//! Canvas coordinates and axis-aligned rectangles.

use serde::{Deserialize, Serialize};

/// A point on the schematic canvas.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if both coordinate deltas are strictly below `tolerance`.
    pub fn is_near(self, other: Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance
    }
}

/// An axis-aligned rectangle given by two corners.
///
/// The corners may be supplied in any order; accessors normalize them.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Rect {
    /// First corner.
    pub a: Point,
    /// Opposite corner.
    pub b: Point,
}

impl Rect {
    /// Creates a rectangle from corner coordinates.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            a: Point::new(x0, y0),
            b: Point::new(x1, y1),
        }
    }

    /// Smallest x coordinate.
    pub fn left(&self) -> f64 {
        self.a.x.min(self.b.x)
    }

    /// Largest x coordinate.
    pub fn right(&self) -> f64 {
        self.a.x.max(self.b.x)
    }

    /// Smallest y coordinate.
    pub fn top(&self) -> f64 {
        self.a.y.min(self.b.y)
    }

    /// Largest y coordinate.
    pub fn bottom(&self) -> f64 {
        self.a.y.max(self.b.y)
    }

    /// Returns `true` if `other` lies completely inside this rectangle.
    ///
    /// Touching edges count as inside.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }
}
