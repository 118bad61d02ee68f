//! Error types for configuration and engine start-up.
//!
//! Nothing inside a tick can fail; every error here happens before the
//! world clock starts.

use std::path::PathBuf;

use starfall_logic::bayes::PriorError;
use starfall_logic::markov::MarkovError;
use thiserror::Error;

/// A configuration that must not be run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("plane dimensions must be positive, got {width}x{height}")]
    Plane { width: u32, height: u32 },
    #[error("particle capacity must be at least 1")]
    Capacity,
    #[error("epoch length must be at least 1 tick")]
    EpochTicks,
    #[error("{name} must be {requirement}, got {value}")]
    Constant {
        name: &'static str,
        requirement: &'static str,
        value: f64,
    },
    #[error("{name} range [{min}, {max}) is empty or not finite")]
    SpawnRange {
        name: &'static str,
        min: f64,
        max: f64,
    },
    #[error("region of interest must have finite, non-negative size")]
    Region,
    #[error("history window must hold at least 1 entry")]
    HistoryLen,
    #[error("density curve needs points >= 1 and x_max > 0 (got {points}, {x_max})")]
    Curve { points: usize, x_max: f64 },
    #[error("invalid intensity chain: {0}")]
    Markov(#[from] MarkovError),
    #[error("invalid prior: {0}")]
    Prior(#[from] PriorError),
}

/// Failure to bring the simulation up.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to spawn world clock thread: {0}")]
    Thread(#[source] std::io::Error),
}
