//! Orbit system - advances the body hierarchy one tick.

use starfall_logic::geometry::Point;

use crate::components::OrbitingBody;

/// Advance the sun and every planet about the world center. Each body
/// finishes its own update before its moons move.
pub fn orbit_system(sun: &mut OrbitingBody, planets: &mut [OrbitingBody], center: Point) {
    sun.update_position(center);
    for planet in planets.iter_mut() {
        planet.update_position(center);
    }
}
