use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of the integer draws the randomized layout needs.
///
/// Implementations must return a value in `low..=high`; callers always pass
/// `low <= high`.
pub trait RandomSource {
    fn pick(&mut self, low: usize, high: usize) -> usize;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn pick(&mut self, low: usize, high: usize) -> usize {
        (**self).pick(low, high)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn pick(&mut self, low: usize, high: usize) -> usize {
        (**self).pick(low, high)
    }
}

/// Adapts any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn pick(&mut self, low: usize, high: usize) -> usize {
        self.0.gen_range(low..=high)
    }
}

/// Replays a fixed list of draws, clamped into the requested range. Once the
/// script runs out every draw returns `low`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    draws: VecDeque<usize>,
}

impl ScriptedSource {
    pub fn new(draws: impl IntoIterator<Item = usize>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedSource {
    fn pick(&mut self, low: usize, high: usize) -> usize {
        self.draws
            .pop_front()
            .map(|draw| draw.clamp(low, high))
            .unwrap_or(low)
    }
}
