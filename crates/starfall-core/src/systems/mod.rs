//! Systems - per-tick logic, run by the engine in a fixed order:
//! orbits → intensity → spawning → falling → occupancy → culling.

mod falling;
mod intensity;
mod occupancy;
mod orbits;
mod spawning;

pub use falling::*;
pub use intensity::*;
pub use occupancy::*;
pub use orbits::*;
pub use spawning::*;
