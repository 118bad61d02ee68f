//! Component definitions.
//!
//! Particle components are pure data attached to ECS entities; behavior
//! lives in systems. Orbiting bodies form a fixed tree and are stored
//! outside the ECS world.

mod bodies;
mod particle;

pub use bodies::*;
pub use particle::*;
