//! Pure simulation logic for Starfall.
//!
//! This crate contains the math behind the simulation that is independent of
//! any entity storage, thread, or transport. Functions take plain data and
//! return results, making them unit-testable and reusable from the engine,
//! the headless harness, and any future front end.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`bayes`] | Gamma density, Gamma-Poisson conjugate posterior, density curve |
//! | [`constants`] | Default world constants (plane, gravity, epochs, windows) |
//! | [`geometry`] | 2-D points, the bounded plane, region-of-interest rectangles |
//! | [`gravity`] | Single forward-Euler step of inverse-square attraction plus drift |
//! | [`markov`] | Arrival-intensity Markov chain: validation and categorical sampling |
//! | [`orbit`] | Angular advance and placement of a body about its reference point |
//! | [`window`] | Bounded FIFO history buffer (sliding window) |

pub mod bayes;
pub mod constants;
pub mod geometry;
pub mod gravity;
pub mod markov;
pub mod orbit;
pub mod window;
