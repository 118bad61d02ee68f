//! Read-only snapshots handed to external consumers.
//!
//! The clock thread copies what readers need into a [`WorldView`] after each
//! tick; readers build the two JSON-facing snapshots from that private copy.
//! Field names of the snapshot types are the wire contract.

use serde::{Deserialize, Serialize};
use starfall_logic::bayes::{DensityCurve, GammaParams};
use starfall_logic::geometry::{Point, Rect};
use starfall_logic::markov::IntensityState;

use crate::components::{OrbitingBody, Rgb};
use crate::config::CurveConfig;

/// A live particle as seen by readers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSnapshot {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

/// A moon: position and display attributes only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonSnapshot {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Rgb,
    /// Sub-moons, omitted from the JSON when there are none.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub moons: Vec<MoonSnapshot>,
}

impl From<&OrbitingBody> for MoonSnapshot {
    fn from(body: &OrbitingBody) -> Self {
        Self {
            x: body.position.x,
            y: body.position.y,
            radius: body.radius,
            color: body.color,
            moons: body.moons.iter().map(MoonSnapshot::from).collect(),
        }
    }
}

/// A root body (sun or planet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Rgb,
    pub orbit_radius: f64,
    pub orbit_color: Rgb,
    pub moons: Vec<MoonSnapshot>,
}

impl From<&OrbitingBody> for BodySnapshot {
    fn from(body: &OrbitingBody) -> Self {
        Self {
            x: body.position.x,
            y: body.position.y,
            radius: body.radius,
            color: body.color,
            orbit_radius: body.orbit.radius,
            orbit_color: body.orbit_color,
            moons: body.moons.iter().map(MoonSnapshot::from).collect(),
        }
    }
}

/// Positions of everything on the plane at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialSnapshot {
    #[serde(rename = "meteors")]
    pub particles: Vec<ParticleSnapshot>,
    pub sun: BodySnapshot,
    pub planets: Vec<BodySnapshot>,
    pub region: Rect,
    pub center: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkovSnapshot {
    pub states: Vec<String>,
    pub rates: Vec<u32>,
    pub current_state: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesianSnapshot {
    pub x_vals: Vec<f64>,
    pub y_vals: Vec<f64>,
    pub alpha_post: f64,
    pub beta_post: f64,
}

/// Intensity chain, recent occupancy, and the posterior rate curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSnapshot {
    pub markov: MarkovSnapshot,
    pub region_counts: Vec<u32>,
    pub bayesian: BayesianSnapshot,
}

/// Point-in-time copy of the world published after each tick.
#[derive(Debug, Clone)]
pub struct WorldView {
    pub tick: u64,
    /// Sorted by id.
    pub particles: Vec<ParticleSnapshot>,
    pub sun: OrbitingBody,
    pub planets: Vec<OrbitingBody>,
    pub region: Rect,
    pub center: Point,
    pub states: Vec<IntensityState>,
    pub current_state: usize,
    /// Most recent region counts, already cut to the exposed length.
    pub region_counts: Vec<u32>,
    /// Whole observation window, oldest first.
    pub observations: Vec<u32>,
    pub prior: GammaParams,
    pub curve: CurveConfig,
}

impl WorldView {
    /// Recomputed from the observation window on every call.
    pub fn posterior(&self) -> GammaParams {
        self.prior.posterior(&self.observations)
    }

    pub fn spatial(&self) -> SpatialSnapshot {
        SpatialSnapshot {
            particles: self.particles.clone(),
            sun: BodySnapshot::from(&self.sun),
            planets: self.planets.iter().map(BodySnapshot::from).collect(),
            region: self.region,
            center: self.center,
        }
    }

    pub fn statistical(&self) -> StatisticalSnapshot {
        let posterior = self.posterior();
        let curve = DensityCurve::sample(&posterior, self.curve.x_max, self.curve.points);
        StatisticalSnapshot {
            markov: MarkovSnapshot {
                states: self.states.iter().map(|s| s.label.clone()).collect(),
                rates: self.states.iter().map(|s| s.rate).collect(),
                current_state: self.current_state,
            },
            region_counts: self.region_counts.clone(),
            bayesian: BayesianSnapshot {
                x_vals: curve.x_vals,
                y_vals: curve.y_vals,
                alpha_post: posterior.alpha,
                beta_post: posterior.beta,
            },
        }
    }
}
