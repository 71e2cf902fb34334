//! Reproducible per-texel Gaussian noise.
//!
//! Each texel draws from its own ChaCha stream, so the samples depend only on
//! `(seed, x, y, size)` and not on evaluation order or thread count.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Source of two independent standard-normal samples per texel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GaussianNoise {
    seed: u64,
}

impl GaussianNoise {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Two independent N(0, 1) samples for texel `(x, y)` of a `size`² grid.
    pub fn pair(&self, x: usize, y: usize, size: usize) -> (f32, f32) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream((y * size + x) as u64);
        (rng.sample(StandardNormal), rng.sample(StandardNormal))
    }
}
