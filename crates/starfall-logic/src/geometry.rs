//! Plane geometry - points, the bounded plane, and region-of-interest rectangles.
//!
//! Screen convention: origin at the top-left, y grows downward.

use serde::{Deserialize, Serialize};

/// A point on the plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Closed containment: points on the edges count as inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// The bounded plane particles live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plane {
    pub width: u32,
    pub height: u32,
}

impl Plane {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// World center, using integer halving of the dimensions.
    pub fn center(&self) -> Point {
        Point::new((self.width / 2) as f64, (self.height / 2) as f64)
    }

    /// Half-open containment: `0 <= x < width` and `0 <= y < height`.
    ///
    /// A particle is culled the tick this returns false.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.x < self.width as f64 && p.y >= 0.0 && p.y < self.height as f64
    }
}
