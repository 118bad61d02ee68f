//! Pure falling logic - one explicit Euler step toward a fixed attractor.
//!
//! Algorithm per tick:
//! 1. Displacement `(dx, dy)` from the particle to the attractor
//! 2. `distance = sqrt(dx² + dy²) + ε` (never zero, even at the attractor)
//! 3. `force = K / distance²`
//! 4. `x += force * dx / distance * mass`
//! 5. `y += speed + force * dy / distance * mass`
//!
//! No velocity is carried between ticks: `speed` is a per-tick downward
//! displacement, not a rate.

use crate::geometry::Point;

/// Fixed attractor parameters shared by every particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attractor {
    pub center: Point,
    /// K in `force = K / distance²`.
    pub strength: f64,
    /// ε added to the raw distance.
    pub epsilon: f64,
}

impl Attractor {
    pub fn new(center: Point, strength: f64, epsilon: f64) -> Self {
        Self {
            center,
            strength,
            epsilon,
        }
    }

    /// Softened distance from `pos` to the attractor. Strictly positive
    /// whenever `epsilon > 0`.
    pub fn distance(&self, pos: Point) -> f64 {
        let dx = self.center.x - pos.x;
        let dy = self.center.y - pos.y;
        (dx * dx + dy * dy).sqrt() + self.epsilon
    }

    /// Advance a particle one tick and return its new position.
    pub fn step(&self, pos: Point, speed: f64, mass: f64) -> Point {
        let dx = self.center.x - pos.x;
        let dy = self.center.y - pos.y;
        let distance = self.distance(pos);
        let force = self.strength / (distance * distance);
        Point {
            x: pos.x + force * dx / distance * mass,
            y: pos.y + speed + force * dy / distance * mass,
        }
    }
}
