//! Injectable randomness for the task generators.
//!
//! Generators never reach for a thread-local RNG. They take a `RandomSource`
//! so tests can hand in a fixed sequence and the CLI can seed a `StdRng`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let idx = (self.next_f64() * len as f64).floor() as usize;
        idx.min(len - 1)
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// `StdRng`-backed source; seeded for reproducible runs, entropy otherwise.
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Values are clamped into `[0, 1)` so a fixture can't push an index out of range.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedSequence {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// A source that always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for FixedSequence {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Fisher-Yates shuffle driven by a `RandomSource`.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.next_index(i + 1);
        items.swap(i, j);
    }
}
