//! Intensity system - epoch-boundary Markov transitions.

use rand::Rng;
use starfall_logic::markov::MarkovChain;
use starfall_logic::window::SlidingWindow;

/// A state change performed at an epoch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
    /// Rate of the new state, as appended to the observation window.
    pub rate: u32,
}

/// On ticks that are a multiple of `epoch_ticks`, sample the next state and
/// record its rate as this epoch's observation.
pub fn intensity_system<R: Rng + ?Sized>(
    chain: &mut MarkovChain,
    observations: &mut SlidingWindow<u32>,
    tick: u64,
    epoch_ticks: u64,
    rng: &mut R,
) -> Option<Transition> {
    if epoch_ticks == 0 || tick % epoch_ticks != 0 {
        return None;
    }
    let from = chain.current();
    let to = chain.step(rng);
    let rate = chain.current_rate();
    observations.push(rate);
    Some(Transition { from, to, rate })
}
