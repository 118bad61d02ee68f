//! Spawning system - adds the current state's batch of particles.

use hecs::World;
use rand::Rng;

use crate::components::{Fall, ParticleId, Position};
use crate::generation::ParticleSpawner;

/// Live particles in the world.
pub fn live_particles(world: &World) -> usize {
    world.query::<&ParticleId>().iter().count()
}

/// If fewer than `capacity` particles are live, spawn exactly `rate` new
/// ones. The check is made once, so a batch may overshoot capacity by up to
/// `rate - 1`. Returns the number spawned.
pub fn spawn_system<R: Rng + ?Sized>(
    world: &mut World,
    spawner: &ParticleSpawner,
    capacity: usize,
    rate: u32,
    next_id: &mut u64,
    rng: &mut R,
) -> usize {
    if live_particles(world) >= capacity {
        return 0;
    }
    for _ in 0..rate {
        let (position, fall) = spawner.spawn(rng);
        world.spawn((ParticleId(*next_id), position, fall));
        *next_id += 1;
    }
    rate as usize
}

/// Spawn a particle at an explicit position (scenario setup and tests).
pub fn spawn_particle_at(
    world: &mut World,
    id: ParticleId,
    position: Position,
    fall: Fall,
) -> hecs::Entity {
    world.spawn((id, position, fall))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spawns_exactly_rate() {
        let mut world = World::new();
        let spawner = ParticleSpawner::from_config(&WorldConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        let mut next_id = 0;
        assert_eq!(spawn_system(&mut world, &spawner, 30, 2, &mut next_id, &mut rng), 2);
        assert_eq!(live_particles(&world), 2);
        assert_eq!(next_id, 2);
    }

    #[test]
    fn test_full_world_spawns_nothing() {
        let mut world = World::new();
        let spawner = ParticleSpawner::from_config(&WorldConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        let mut next_id = 0;
        for _ in 0..5 {
            spawn_system(&mut world, &spawner, 5, 1, &mut next_id, &mut rng);
        }
        assert_eq!(live_particles(&world), 5);
        assert_eq!(spawn_system(&mut world, &spawner, 5, 3, &mut next_id, &mut rng), 0);
        assert_eq!(live_particles(&world), 5);
    }

    #[test]
    fn test_batch_may_overshoot_capacity() {
        let mut world = World::new();
        let spawner = ParticleSpawner::from_config(&WorldConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        let mut next_id = 0;
        spawn_system(&mut world, &spawner, 30, 29, &mut next_id, &mut rng);
        assert_eq!(spawn_system(&mut world, &spawner, 30, 3, &mut next_id, &mut rng), 3);
        assert_eq!(live_particles(&world), 32);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut world = World::new();
        let spawner = ParticleSpawner::from_config(&WorldConfig::default());
        let mut rng = StdRng::seed_from_u64(4);
        let mut next_id = 0;
        spawn_system(&mut world, &spawner, 100, 50, &mut next_id, &mut rng);
        let mut ids: Vec<u64> = world.query::<&ParticleId>().iter().map(|(_, id)| id.0).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }
}
