/// Injected randomness for the simulation engine.
///
/// Every simulation call takes a `&mut dyn RandomSource` instead of reaching
/// for a global generator. Production code uses `EntropySource`; tests pass
/// a `SeededSource` for reproducible sequences or a `FixedSequence` to force
/// exact draws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_uniform(&mut self) -> f64;

    /// Draw centred on zero: uniform in `[-0.5, 0.5)`.
    fn next_centered(&mut self) -> f64 {
        self.next_uniform() - 0.5
    }
}

// ---------------------------------------------------------------------------
// Production source
// ---------------------------------------------------------------------------

/// Standard PRNG seeded from OS entropy. One per request.
pub struct EntropySource {
    rng: StdRng,
}

impl EntropySource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropySource {
    fn next_uniform(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

// ---------------------------------------------------------------------------
// Test sources
// ---------------------------------------------------------------------------

/// Deterministic PRNG: identical seeds yield identical sequences.
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_uniform(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// `FixedSequence::constant(0.5)` forces every centred draw to zero.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedSequence {
    /// Values are clamped into `[0, 1)`; an empty list behaves like `[0.5]`.
    pub fn new(values: &[f64]) -> Self {
        let values = if values.is_empty() {
            vec![0.5]
        } else {
            values
                .iter()
                .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
                .collect()
        };
        Self { values, cursor: 0 }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(&[value])
    }
}

impl RandomSource for FixedSequence {
    fn next_uniform(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
