//! Default world constants.
//!
//! These are the values the engine's `WorldConfig::default()` is built from.
//! Grouped as modules of plain constants so callers can import one family.

/// Bounded plane dimensions (pixels).
pub mod plane {
    pub const WIDTH: u32 = 800;
    pub const HEIGHT: u32 = 600;
}

/// Inverse-square attractor at the world center.
pub mod gravity {
    /// Force constant K in `force = K / distance²`.
    pub const STRENGTH: f64 = 100.0;
    /// Added to every distance so a particle at the exact center is defined.
    pub const EPSILON: f64 = 0.1;
}

/// Particle spawning.
pub mod spawn {
    /// Live-particle capacity checked once per tick before spawning.
    pub const CAPACITY: usize = 30;
    pub const SPEED_MIN: f64 = 0.5;
    pub const SPEED_MAX: f64 = 1.5;
    pub const MASS_MIN: f64 = 0.5;
    pub const MASS_MAX: f64 = 1.5;
}

/// World clock pacing and epochs.
pub mod clock {
    /// Sleep between ticks (~30 ticks per second).
    pub const TICK_INTERVAL_MS: u64 = 33;
    /// Ticks between Markov transitions.
    pub const EPOCH_TICKS: u64 = 100;
}

/// Region of interest (closed rectangle, top-left origin).
pub mod region {
    pub const X: f64 = 300.0;
    pub const Y: f64 = 200.0;
    pub const WIDTH: f64 = 200.0;
    pub const HEIGHT: f64 = 200.0;
}

/// History windows and the statistical snapshot.
pub mod history {
    /// Entries retained in both the observation and region-occupancy windows.
    pub const WINDOW_LEN: usize = 500;
    /// Most recent region counts exposed in the statistical snapshot.
    pub const EXPOSED_REGION_COUNTS: usize = 50;
}

/// Gamma prior and the exposed density curve.
pub mod bayes {
    pub const ALPHA_PRIOR: f64 = 2.0;
    pub const BETA_PRIOR: f64 = 1.0;
    pub const CURVE_X_MAX: f64 = 10.0;
    pub const CURVE_POINTS: usize = 200;
}
