//! Orbit hierarchy construction from configuration.

use rand::Rng;
use starfall_logic::geometry::Point;
use starfall_logic::orbit::Orbit;
use std::f64::consts::TAU;

use crate::components::OrbitingBody;
use crate::config::BodyConfig;

/// Build a body and its moons, each starting at a random angle in
/// `[0, 2π)`, placed about `reference` without advancing.
pub fn generate_body<R: Rng + ?Sized>(
    config: &BodyConfig,
    reference: Point,
    rng: &mut R,
) -> OrbitingBody {
    let mut body = build(config, rng);
    body.place(reference);
    body
}

fn build<R: Rng + ?Sized>(config: &BodyConfig, rng: &mut R) -> OrbitingBody {
    let angle = rng.gen::<f64>() * TAU;
    let mut body = OrbitingBody::new(
        config.color,
        config.radius,
        Orbit::new(config.orbit_radius, config.speed, angle),
        config.orbit_color,
    );
    body.moons = config.moons.iter().map(|m| build(m, rng)).collect();
    body
}
