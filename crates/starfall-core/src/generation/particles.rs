//! Particle spawning along the top edge of the plane.

use rand::Rng;

use crate::components::{Fall, Position};
use crate::config::{SpawnRange, WorldConfig};

/// Draws spawn position and per-particle constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpawner {
    pub width: u32,
    pub speed: SpawnRange,
    pub mass: SpawnRange,
}

impl ParticleSpawner {
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            width: config.width,
            speed: config.speed_range,
            mass: config.mass_range,
        }
    }

    /// x is a whole pixel in `[0, width)`, y is the top edge.
    pub fn spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> (Position, Fall) {
        let x = rng.gen_range(0..self.width) as f64;
        let speed = rng.gen_range(self.speed.min..self.speed.max);
        let mass = rng.gen_range(self.mass.min..self.mass.max);
        (Position::new(x, 0.0), Fall { speed, mass })
    }
}
