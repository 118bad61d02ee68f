//! Generation - creation of the orbit hierarchy and new particles.

mod bodies;
mod particles;

pub use bodies::*;
pub use particles::*;
