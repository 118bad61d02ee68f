//! Arrival-intensity Markov chain.
//!
//! A finite set of labelled states, each mapped to a positive spawn rate,
//! and a row-stochastic transition matrix with strictly positive entries
//! (so the chain is ergodic by construction). Transitions draw the next
//! state from the current state's row with a categorical sample.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Row sums must be within this distance of 1.
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// One labelled intensity state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityState {
    pub label: String,
    /// Particles spawned per tick while this state is current.
    pub rate: u32,
}

impl IntensityState {
    pub fn new(label: impl Into<String>, rate: u32) -> Self {
        Self {
            label: label.into(),
            rate,
        }
    }
}

/// Reasons a state table / transition matrix pair is rejected.
#[derive(Debug, Error)]
pub enum MarkovError {
    #[error("state table is empty")]
    NoStates,
    #[error("state {index} ({label}) has a zero rate")]
    ZeroRate { index: usize, label: String },
    #[error("transition matrix has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },
    #[error("transition matrix row {row} has {found} entries, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("transition matrix entry [{row}][{col}] = {value} must be finite and > 0")]
    Entry { row: usize, col: usize, value: f64 },
    #[error("transition matrix row {row} sums to {sum}, expected 1")]
    RowSum { row: usize, sum: f64 },
    #[error("initial state {index} out of range for {states} states")]
    InitialState { index: usize, states: usize },
}

/// Check a state table, matrix and starting index without building a chain.
pub fn validate(
    states: &[IntensityState],
    matrix: &[Vec<f64>],
    initial: usize,
) -> Result<(), MarkovError> {
    let n = states.len();
    if n == 0 {
        return Err(MarkovError::NoStates);
    }
    if let Some((index, s)) = states.iter().enumerate().find(|(_, s)| s.rate == 0) {
        return Err(MarkovError::ZeroRate {
            index,
            label: s.label.clone(),
        });
    }
    if matrix.len() != n {
        return Err(MarkovError::RowCount {
            expected: n,
            found: matrix.len(),
        });
    }
    for (row, entries) in matrix.iter().enumerate() {
        if entries.len() != n {
            return Err(MarkovError::RowLength {
                row,
                expected: n,
                found: entries.len(),
            });
        }
        if let Some((col, &value)) = entries
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v <= 0.0)
        {
            return Err(MarkovError::Entry { row, col, value });
        }
        let sum: f64 = entries.iter().sum();
        if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
            return Err(MarkovError::RowSum { row, sum });
        }
    }
    if initial >= n {
        return Err(MarkovError::InitialState {
            index: initial,
            states: n,
        });
    }
    Ok(())
}

/// The process-wide intensity chain.
#[derive(Debug, Clone)]
pub struct MarkovChain {
    states: Vec<IntensityState>,
    matrix: Vec<Vec<f64>>,
    rows: Vec<WeightedIndex<f64>>,
    current: usize,
}

impl MarkovChain {
    pub fn new(
        states: Vec<IntensityState>,
        matrix: Vec<Vec<f64>>,
        initial: usize,
    ) -> Result<Self, MarkovError> {
        validate(&states, &matrix, initial)?;
        let rows = matrix
            .iter()
            .enumerate()
            .map(|(row, entries)| {
                WeightedIndex::new(entries.iter().copied()).map_err(|_| MarkovError::RowSum {
                    row,
                    sum: entries.iter().sum(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            states,
            matrix,
            rows,
            current: initial,
        })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_state(&self) -> &IntensityState {
        &self.states[self.current]
    }

    pub fn current_rate(&self) -> u32 {
        self.current_state().rate
    }

    pub fn states(&self) -> &[IntensityState] {
        &self.states
    }

    pub fn rates(&self) -> Vec<u32> {
        self.states.iter().map(|s| s.rate).collect()
    }

    /// Row of the transition matrix for `from`.
    pub fn row(&self, from: usize) -> Option<&[f64]> {
        self.matrix.get(from).map(Vec::as_slice)
    }

    /// Force the current state (e.g. to seed a scenario).
    pub fn set_current(&mut self, index: usize) -> Result<(), MarkovError> {
        if index >= self.states.len() {
            return Err(MarkovError::InitialState {
                index,
                states: self.states.len(),
            });
        }
        self.current = index;
        Ok(())
    }

    /// Draw the next state from the current row and make it current.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        self.current = self.rows[self.current].sample(rng);
        self.current
    }
}
