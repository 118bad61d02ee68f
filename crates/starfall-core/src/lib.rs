//! Starfall Core - Particle Field and Intensity Inference Engine
//!
//! A continuously running world: particles fall from the top edge of a
//! bounded plane while being pulled toward its center, a sun and planets
//! (with moons) orbit that center, and a Markov chain over arrival
//! intensity decides how many particles spawn each tick. Each epoch's rate
//! feeds a Gamma-Poisson posterior over the arrival rate.
//!
//! # Architecture
//!
//! Live particles are ECS entities in a `hecs` world:
//! - **Components**: `ParticleId`, `Position`, `Fall` (speed and mass)
//! - **Systems**: orbit, intensity, spawning, falling, occupancy, culling
//! - **Engine**: owns all state and runs the systems in a fixed order
//! - **Runner**: the world clock thread, publishing read-only views
//!
//! # Example
//!
//! ```rust,no_run
//! use starfall_core::prelude::*;
//!
//! let runner = SimulationRunner::start(WorldConfig::default()).unwrap();
//!
//! // Read from any thread while the clock keeps ticking
//! let spatial = runner.spatial_snapshot();
//! let stats = runner.statistical_snapshot();
//! println!("{} particles, alpha_post = {}", spatial.particles.len(), stats.bayesian.alpha_post);
//!
//! runner.shutdown();
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod runner;
pub mod snapshot;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::WorldConfig;
    pub use crate::engine::{SimulationEngine, TickReport};
    pub use crate::error::{ConfigError, EngineError};
    pub use crate::runner::SimulationRunner;
    pub use crate::snapshot::{SpatialSnapshot, StatisticalSnapshot, WorldView};
}
