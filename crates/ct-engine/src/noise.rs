//! Shared white-noise source.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Seed used by [`NoiseBuffer::new`], so renders are repeatable.
pub const NOISE_SEED: u64 = 0x6368_6970_7469_6465;

/// One second of uniform white noise, read by every noise voice.
///
/// Built once per renderer and never rewritten.
#[derive(Clone, Debug)]
pub struct NoiseBuffer {
    samples: Vec<f32>,
}

impl NoiseBuffer {
    pub fn new(sample_rate: u32) -> Self {
        Self::with_seed(sample_rate, NOISE_SEED)
    }

    pub fn with_seed(sample_rate: u32, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let samples = (0..sample_rate.max(1))
            .map(|_| rng.random_range(-1.0f32..1.0))
            .collect();
        Self { samples }
    }

    /// Sample at `pos`, looping.
    pub fn sample(&self, pos: usize) -> f32 {
        self.samples[pos % self.samples.len()]
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
