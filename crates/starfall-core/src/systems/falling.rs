//! Falling system - integrates every live particle one step.

use hecs::World;
use starfall_logic::gravity::Attractor;

use crate::components::{Fall, Position};

/// Apply one gravity step to every particle.
pub fn fall_system(world: &mut World, attractor: &Attractor) {
    for (_entity, (pos, fall)) in world.query_mut::<(&mut Position, &Fall)>() {
        *pos = attractor.step(pos.point(), fall.speed, fall.mass).into();
    }
}
