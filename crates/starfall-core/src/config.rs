//! World configuration - fixed at start-up and immutable afterwards.
//!
//! Every field has a default matching the reference world (800x600 plane,
//! 30-particle capacity, three intensity states, Gamma(2, 1) prior, sun and
//! four planets). A JSON file only needs the fields it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use starfall_logic::bayes::GammaParams;
use starfall_logic::constants::{bayes, clock, gravity, history, plane, region, spawn};
use starfall_logic::geometry::{Plane, Rect};
use starfall_logic::markov::{self, IntensityState};

use crate::components::Rgb;
use crate::error::ConfigError;

/// Half-open `[min, max)` range for a uniform draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRange {
    pub min: f64,
    pub max: f64,
}

impl SpawnRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Finite, non-empty, and narrow enough that `max - min` is finite
    /// (a uniform draw over a wider span is undefined).
    fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min < self.max
            && (self.max - self.min).is_finite()
    }
}

/// Sampling of the posterior density curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    pub x_max: f64,
    pub points: usize,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            x_max: bayes::CURVE_X_MAX,
            points: bayes::CURVE_POINTS,
        }
    }
}

/// One body in the orbit hierarchy. Initial angles are random.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub color: Rgb,
    pub radius: f64,
    pub orbit_radius: f64,
    /// Radians per tick.
    pub speed: f64,
    #[serde(default)]
    pub orbit_color: Rgb,
    #[serde(default)]
    pub moons: Vec<BodyConfig>,
}

impl BodyConfig {
    pub fn new(color: Rgb, radius: f64, orbit_radius: f64, speed: f64) -> Self {
        Self {
            color,
            radius,
            orbit_radius,
            speed,
            orbit_color: Rgb::GRAY,
            moons: Vec::new(),
        }
    }

    pub fn orbit_color(mut self, color: Rgb) -> Self {
        self.orbit_color = color;
        self
    }

    pub fn moon(mut self, moon: BodyConfig) -> Self {
        self.moons.push(moon);
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("body radius", self.radius)?;
        non_negative("orbit radius", self.orbit_radius)?;
        finite("orbit speed", self.speed)?;
        self.moons.iter().try_for_each(BodyConfig::validate)
    }
}

/// Complete start-up configuration of the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    /// Spawning is skipped on ticks that start with this many live particles.
    pub capacity: usize,
    pub tick_interval_ms: u64,
    pub epoch_ticks: u64,
    pub gravity: f64,
    pub epsilon: f64,
    pub speed_range: SpawnRange,
    pub mass_range: SpawnRange,
    pub states: Vec<IntensityState>,
    pub transition_matrix: Vec<Vec<f64>>,
    pub initial_state: usize,
    pub prior: GammaParams,
    pub region: Rect,
    pub history_len: usize,
    pub exposed_region_counts: usize,
    pub curve: CurveConfig,
    pub sun: BodyConfig,
    pub planets: Vec<BodyConfig>,
    /// Fixed seed for a reproducible run; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: plane::WIDTH,
            height: plane::HEIGHT,
            capacity: spawn::CAPACITY,
            tick_interval_ms: clock::TICK_INTERVAL_MS,
            epoch_ticks: clock::EPOCH_TICKS,
            gravity: gravity::STRENGTH,
            epsilon: gravity::EPSILON,
            speed_range: SpawnRange::new(spawn::SPEED_MIN, spawn::SPEED_MAX),
            mass_range: SpawnRange::new(spawn::MASS_MIN, spawn::MASS_MAX),
            states: vec![
                IntensityState::new("low", 1),
                IntensityState::new("medium", 2),
                IntensityState::new("high", 3),
            ],
            transition_matrix: vec![
                vec![0.6, 0.3, 0.1],
                vec![0.2, 0.5, 0.3],
                vec![0.1, 0.3, 0.6],
            ],
            initial_state: 1,
            prior: GammaParams::new(bayes::ALPHA_PRIOR, bayes::BETA_PRIOR),
            region: Rect::new(region::X, region::Y, region::WIDTH, region::HEIGHT),
            history_len: history::WINDOW_LEN,
            exposed_region_counts: history::EXPOSED_REGION_COUNTS,
            curve: CurveConfig::default(),
            sun: BodyConfig::new(Rgb::YELLOW, 20.0, 0.0, 0.0),
            planets: vec![
                BodyConfig::new(Rgb::ORANGE, 8.0, 60.0, 0.01).orbit_color(Rgb::PURPLE),
                BodyConfig::new(Rgb::BLUE, 10.0, 100.0, 0.008)
                    .orbit_color(Rgb::CYAN)
                    .moon(BodyConfig::new(Rgb::GRAY, 3.0, 15.0, 0.05)),
                BodyConfig::new(Rgb::RED, 6.0, 150.0, 0.006)
                    .orbit_color(Rgb::PINK)
                    .moon(BodyConfig::new(Rgb::WHITE, 2.0, 10.0, 0.07)),
                BodyConfig::new(Rgb::GREEN, 7.0, 200.0, 0.004)
                    .orbit_color(Rgb::YELLOW_GREEN)
                    .moon(BodyConfig::new(Rgb::GRAY, 2.0, 18.0, 0.04)),
            ],
            seed: None,
        }
    }
}

impl WorldConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn plane(&self) -> Plane {
        Plane::new(self.width, self.height)
    }

    /// Reject anything that would leave the statistics or physics undefined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Plane {
                width: self.width,
                height: self.height,
            });
        }
        if self.capacity == 0 {
            return Err(ConfigError::Capacity);
        }
        if self.epoch_ticks == 0 {
            return Err(ConfigError::EpochTicks);
        }
        finite("gravity", self.gravity)?;
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(ConfigError::Constant {
                name: "epsilon",
                requirement: "finite and > 0",
                value: self.epsilon,
            });
        }
        for (name, range) in [("speed", self.speed_range), ("mass", self.mass_range)] {
            if !range.is_valid() {
                return Err(ConfigError::SpawnRange {
                    name,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        let r = self.region;
        let finite_rect = [r.x, r.y, r.width, r.height].iter().all(|v| v.is_finite());
        if !finite_rect || r.width < 0.0 || r.height < 0.0 {
            return Err(ConfigError::Region);
        }
        if self.history_len == 0 {
            return Err(ConfigError::HistoryLen);
        }
        if self.curve.points == 0 || !self.curve.x_max.is_finite() || self.curve.x_max <= 0.0 {
            return Err(ConfigError::Curve {
                points: self.curve.points,
                x_max: self.curve.x_max,
            });
        }
        markov::validate(&self.states, &self.transition_matrix, self.initial_state)?;
        self.prior.validate()?;
        self.sun.validate()?;
        self.planets.iter().try_for_each(BodyConfig::validate)
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Constant {
            name,
            requirement: "finite",
            value,
        })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Constant {
            name,
            requirement: "finite and >= 0",
            value,
        })
    }
}
