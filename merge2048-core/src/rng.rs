//! Random sources for tile spawning.

use rand::rngs::StdRng;
use rand::Rng;

/// Anything that can draw a uniform integer below a bound.
///
/// Implementations must return a value in `[0, bound)`; `bound` is never 0.
pub trait RandomSource {
    fn next_below(&mut self, bound: u32) -> u32;
}

impl RandomSource for StdRng {
    fn next_below(&mut self, bound: u32) -> u32 {
        self.random_range(0..bound)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_below(&mut self, bound: u32) -> u32 {
        (**self).next_below(bound)
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Each draw is reduced modulo the requested bound, so scripted values never
/// escape the range the caller asked for. An empty script always yields 0.
#[derive(Clone, Debug, Default)]
pub struct FixedSequence {
    values: Vec<u32>,
    cursor: usize,
}

impl FixedSequence {
    pub fn new(values: impl Into<Vec<u32>>) -> FixedSequence {
        FixedSequence {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for FixedSequence {
    fn next_below(&mut self, bound: u32) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value % bound
    }
}
