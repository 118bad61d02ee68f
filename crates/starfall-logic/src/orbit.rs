//! Circular orbit placement.
//!
//! A body's position is a pure function of its angle and orbit radius about
//! a reference point: the world center for a root body, the parent's
//! position (already updated this tick) for a satellite.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Angular state of one orbit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    pub radius: f64,
    /// Radians added to `angle` each tick.
    pub speed: f64,
    /// Current angle (radians). Not wrapped; trig periodicity handles it.
    pub angle: f64,
}

impl Orbit {
    pub fn new(radius: f64, speed: f64, angle: f64) -> Self {
        Self {
            radius,
            speed,
            angle,
        }
    }

    /// Position for the current angle about `reference`.
    pub fn position_about(&self, reference: Point) -> Point {
        Point {
            x: reference.x + self.radius * self.angle.cos(),
            y: reference.y + self.radius * self.angle.sin(),
        }
    }

    /// Advance one tick and return the new position about `reference`.
    pub fn advance(&mut self, reference: Point) -> Point {
        self.angle += self.speed;
        self.position_about(reference)
    }
}
