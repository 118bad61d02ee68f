//! Orbiting bodies - the sun, planets and their moons.
//!
//! The hierarchy is built once at world creation and only angles and
//! positions change afterwards. Updating a body always finalizes its own
//! position before any of its moons move, so a moon orbits the parent's
//! position for the same tick.

use serde::{Deserialize, Serialize};
use starfall_logic::geometry::Point;
use starfall_logic::orbit::Orbit;

/// Display color, serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const YELLOW: Self = Self(255, 255, 0);
    pub const BLUE: Self = Self(0, 0, 255);
    pub const RED: Self = Self(255, 0, 0);
    pub const GREEN: Self = Self(0, 255, 0);
    pub const ORANGE: Self = Self(255, 165, 0);
    pub const GRAY: Self = Self(200, 200, 200);
    pub const PURPLE: Self = Self(128, 0, 128);
    pub const CYAN: Self = Self(0, 255, 255);
    pub const WHITE: Self = Self(255, 255, 255);
    pub const PINK: Self = Self(255, 182, 193);
    pub const YELLOW_GREEN: Self = Self(173, 255, 47);
}

impl Default for Rgb {
    fn default() -> Self {
        Self::GRAY
    }
}

/// A body on a circular orbit with any number of nested moons.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitingBody {
    pub color: Rgb,
    pub radius: f64,
    pub orbit_color: Rgb,
    pub orbit: Orbit,
    /// Position derived from `orbit` about the reference point.
    pub position: Point,
    pub moons: Vec<OrbitingBody>,
}

impl OrbitingBody {
    pub fn new(color: Rgb, radius: f64, orbit: Orbit, orbit_color: Rgb) -> Self {
        Self {
            color,
            radius,
            orbit_color,
            orbit,
            position: Point::default(),
            moons: Vec::new(),
        }
    }

    pub fn with_moon(mut self, moon: OrbitingBody) -> Self {
        self.moons.push(moon);
        self
    }

    /// Advance this body about `reference`, then each moon about this
    /// body's new position.
    pub fn update_position(&mut self, reference: Point) {
        self.position = self.orbit.advance(reference);
        let parent = self.position;
        for moon in &mut self.moons {
            moon.update_position(parent);
        }
    }

    /// Place without advancing (used once after construction).
    pub fn place(&mut self, reference: Point) {
        self.position = self.orbit.position_about(reference);
        let parent = self.position;
        for moon in &mut self.moons {
            moon.place(parent);
        }
    }

    /// This body plus all descendants.
    pub fn body_count(&self) -> usize {
        1 + self.moons.iter().map(OrbitingBody::body_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet_with_moon() -> OrbitingBody {
        OrbitingBody::new(Rgb::BLUE, 10.0, Orbit::new(100.0, 0.008, 0.0), Rgb::CYAN)
            .with_moon(OrbitingBody::new(
                Rgb::GRAY,
                3.0,
                Orbit::new(15.0, 0.05, 1.0),
                Rgb::GRAY,
            ))
    }

    #[test]
    fn test_moon_orbits_parent_position_same_tick() {
        let center = Point::new(400.0, 300.0);
        let mut planet = planet_with_moon();
        for _ in 0..50 {
            planet.update_position(center);
            let moon = &planet.moons[0];
            let expected = moon.orbit.position_about(planet.position);
            assert!((moon.position.x - expected.x).abs() < 1e-12);
            assert!((moon.position.y - expected.y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_nested_moons_follow_chain() {
        let center = Point::new(400.0, 300.0);
        let sub = OrbitingBody::new(Rgb::WHITE, 1.0, Orbit::new(4.0, 0.2, 0.0), Rgb::GRAY);
        let mut planet = planet_with_moon();
        planet.moons[0].moons.push(sub);
        assert_eq!(planet.body_count(), 3);

        planet.update_position(center);
        let moon = &planet.moons[0];
        let sub = &moon.moons[0];
        let d = ((sub.position.x - moon.position.x).powi(2)
            + (sub.position.y - moon.position.y).powi(2))
        .sqrt();
        assert!((d - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_advances_by_speed() {
        let mut planet = planet_with_moon();
        planet.update_position(Point::default());
        planet.update_position(Point::default());
        assert!((planet.orbit.angle - 0.016).abs() < 1e-15);
        assert!((planet.moons[0].orbit.angle - 1.1).abs() < 1e-12);
    }
}
