//! Occupancy and culling systems.

use hecs::{Entity, World};
use starfall_logic::geometry::{Plane, Rect};

use crate::components::Position;

/// Number of particles inside the closed `region`.
pub fn occupancy_system(world: &World, region: &Rect) -> u32 {
    world
        .query::<&Position>()
        .iter()
        .filter(|(_, pos)| region.contains(pos.point()))
        .count() as u32
}

/// Despawn every particle outside the plane. Returns how many were removed.
pub fn cull_system(world: &mut World, plane: &Plane) -> usize {
    let outside: Vec<Entity> = world
        .query::<&Position>()
        .iter()
        .filter(|(_, pos)| !plane.contains(pos.point()))
        .map(|(entity, _)| entity)
        .collect();
    for &entity in &outside {
        let _ = world.despawn(entity);
    }
    outside.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Fall, ParticleId};

    fn world_with(points: &[(f64, f64)]) -> World {
        let mut world = World::new();
        for (i, &(x, y)) in points.iter().enumerate() {
            world.spawn((
                ParticleId(i as u64),
                Position::new(x, y),
                Fall { speed: 1.0, mass: 1.0 },
            ));
        }
        world
    }

    #[test]
    fn test_region_count_is_closed() {
        let world = world_with(&[
            (300.0, 200.0),
            (500.0, 400.0),
            (400.0, 300.0),
            (299.9, 300.0),
            (10.0, 10.0),
        ]);
        let region = Rect::new(300.0, 200.0, 200.0, 200.0);
        assert_eq!(occupancy_system(&world, &region), 3);
    }

    #[test]
    fn test_cull_removes_exactly_outside() {
        let mut world = world_with(&[
            (0.0, 0.0),
            (799.5, 599.5),
            (800.0, 100.0),
            (100.0, 600.0),
            (-1.0, 5.0),
            (400.0, 300.0),
        ]);
        let plane = Plane::new(800, 600);
        assert_eq!(cull_system(&mut world, &plane), 3);
        let mut left: Vec<u64> = world.query::<&ParticleId>().iter().map(|(_, id)| id.0).collect();
        left.sort_unstable();
        assert_eq!(left, vec![0, 1, 5]);
    }
}
