//! Simulation engine - the single owner and writer of world state

use hecs::World;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use starfall_logic::bayes::GammaParams;
use starfall_logic::geometry::Plane;
use starfall_logic::gravity::Attractor;
use starfall_logic::markov::{IntensityState, MarkovChain, MarkovError};
use starfall_logic::window::SlidingWindow;

use crate::components::*;
use crate::config::WorldConfig;
use crate::error::ConfigError;
use crate::generation::{generate_body, ParticleSpawner};
use crate::snapshot::{ParticleSnapshot, SpatialSnapshot, StatisticalSnapshot, WorldView};
use crate::systems::*;

/// Boxed source of every random draw in the world.
pub type SimRng = Box<dyn RngCore + Send>;

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub spawned: usize,
    pub culled: usize,
    /// Live particles after culling.
    pub live: usize,
    pub region_count: u32,
    pub transition: Option<Transition>,
}

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world holding the live particles
    pub world: World,
    /// Root body at the world center
    pub sun: OrbitingBody,
    /// Other root bodies, each with its moons
    pub planets: Vec<OrbitingBody>,
    /// Arrival-intensity chain
    pub chain: MarkovChain,
    /// Rate recorded at each epoch transition
    pub observations: SlidingWindow<u32>,
    /// Particles inside the region of interest, one entry per tick
    pub region_counts: SlidingWindow<u32>,

    tick: u64,
    next_particle_id: u64,
    rng: SimRng,

    // Configuration
    config: WorldConfig,
    plane: Plane,
    attractor: Attractor,
    spawner: ParticleSpawner,
}

impl SimulationEngine {
    /// Validate `config` and build a world seeded from `config.seed`, or from
    /// entropy when no seed is set.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        let rng: SimRng = match config.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_entropy()),
        };
        Self::with_rng(config, rng)
    }

    /// Build a world drawing from the given randomness source.
    pub fn with_rng(config: WorldConfig, mut rng: SimRng) -> Result<Self, ConfigError> {
        config.validate()?;

        let plane = config.plane();
        let center = plane.center();
        let chain = MarkovChain::new(
            config.states.clone(),
            config.transition_matrix.clone(),
            config.initial_state,
        )?;
        let sun = generate_body(&config.sun, center, &mut *rng);
        let planets = config
            .planets
            .iter()
            .map(|p| generate_body(p, center, &mut *rng))
            .collect::<Vec<_>>();

        info!(
            "world built: {}x{} plane, capacity {}, {} bodies, initial state {}",
            config.width,
            config.height,
            config.capacity,
            sun.body_count() + planets.iter().map(OrbitingBody::body_count).sum::<usize>(),
            chain.current_state().label,
        );

        Ok(Self {
            world: World::new(),
            sun,
            planets,
            chain,
            observations: SlidingWindow::new(config.history_len),
            region_counts: SlidingWindow::new(config.history_len),
            tick: 0,
            next_particle_id: 0,
            rng,
            plane,
            attractor: Attractor::new(center, config.gravity, config.epsilon),
            spawner: ParticleSpawner::from_config(&config),
            config,
        })
    }

    /// Advance the world by one tick.
    ///
    /// Order: orbits, epoch transition, spawning, falling, region count,
    /// culling, history append.
    pub fn update(&mut self) -> TickReport {
        self.tick += 1;

        orbit_system(&mut self.sun, &mut self.planets, self.plane.center());

        let transition = intensity_system(
            &mut self.chain,
            &mut self.observations,
            self.tick,
            self.config.epoch_ticks,
            &mut *self.rng,
        );
        if let Some(t) = transition {
            debug!(
                "tick {}: intensity {} -> {} (rate {})",
                self.tick,
                self.chain.states()[t.from].label,
                self.chain.states()[t.to].label,
                t.rate
            );
        }

        let spawned = spawn_system(
            &mut self.world,
            &self.spawner,
            self.config.capacity,
            self.chain.current_rate(),
            &mut self.next_particle_id,
            &mut *self.rng,
        );

        fall_system(&mut self.world, &self.attractor);

        let region_count = occupancy_system(&self.world, &self.config.region);
        let culled = cull_system(&mut self.world, &self.plane);
        self.region_counts.push(region_count);

        let live = live_particles(&self.world);
        trace!(
            "tick {}: live {}, spawned {}, culled {}, in region {}",
            self.tick,
            live,
            spawned,
            culled,
            region_count
        );

        TickReport {
            tick: self.tick,
            spawned,
            culled,
            live,
            region_count,
            transition,
        }
    }

    /// Ticks completed so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn live_count(&self) -> usize {
        live_particles(&self.world)
    }

    pub fn current_state(&self) -> &IntensityState {
        self.chain.current_state()
    }

    /// Force the intensity state (scenario setup).
    pub fn set_intensity_state(&mut self, index: usize) -> Result<(), MarkovError> {
        self.chain.set_current(index)
    }

    /// Add a particle at a chosen position, bypassing the spawn rule.
    pub fn insert_particle(&mut self, position: Position, fall: Fall) -> ParticleId {
        let id = ParticleId(self.next_particle_id);
        self.next_particle_id += 1;
        spawn_particle_at(&mut self.world, id, position, fall);
        id
    }

    /// Live particles sorted by id.
    pub fn particles(&self) -> Vec<(ParticleId, Position)> {
        let mut out: Vec<(ParticleId, Position)> = self
            .world
            .query::<(&ParticleId, &Position)>()
            .iter()
            .map(|(_, (id, pos))| (*id, *pos))
            .collect();
        out.sort_by_key(|(id, _)| *id);
        out
    }

    /// Posterior over the current observation window.
    pub fn posterior(&self) -> GammaParams {
        self.config.prior.posterior(self.observations.iter())
    }

    /// Copy out everything readers need.
    pub fn view(&self) -> WorldView {
        WorldView {
            tick: self.tick,
            particles: self
                .particles()
                .into_iter()
                .map(|(id, pos)| ParticleSnapshot {
                    id: id.0,
                    x: pos.x,
                    y: pos.y,
                })
                .collect(),
            sun: self.sun.clone(),
            planets: self.planets.clone(),
            region: self.config.region,
            center: self.plane.center(),
            states: self.chain.states().to_vec(),
            current_state: self.chain.current(),
            region_counts: self.region_counts.tail(self.config.exposed_region_counts),
            observations: self.observations.to_vec(),
            prior: self.config.prior,
            curve: self.config.curve,
        }
    }

    pub fn spatial_snapshot(&self) -> SpatialSnapshot {
        self.view().spatial()
    }

    pub fn statistical_snapshot(&self) -> StatisticalSnapshot {
        self.view().statistical()
    }
}
