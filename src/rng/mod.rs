//! Replaceable randomness source for the bounded "AI confidence" jitter.
//!
//! Every random draw in the engine goes through [`RandomSource`] so tests
//! can pin the perturbation without disabling it globally. A fresh source is
//! built per invocation from the configured [`JitterPolicy`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

/// A bounded random draw provider. All draws return a value in
/// `[min, max]`; implementations must never exceed the bounds.
pub trait RandomSource {
    fn draw(&mut self, min: f64, max: f64) -> f64;
}

/// Always returns the lower bound. Used when jitter is disabled.
pub struct PinnedSource;

impl RandomSource for PinnedSource {
    fn draw(&mut self, min: f64, _max: f64) -> f64 {
        min
    }
}

/// Seeded rng-backed source; reproducible for a given seed.
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
    fn draw(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// Process-wide jitter policy; loaded from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JitterPolicy {
    /// Every draw returns its lower bound.
    Disabled,
    /// Per-event seed derived from `sha256(event_id)` XOR the base seed;
    /// repeated calls for the same event are bit-identical.
    Seeded(u64),
    /// OS-seeded per invocation.
    Entropy,
}

impl JitterPolicy {
    /// Build a fresh source for one engine invocation.
    pub fn source_for(&self, event_id: &str) -> Box<dyn RandomSource> {
        match self {
            Self::Disabled => Box::new(PinnedSource),
            Self::Seeded(base) => Box::new(SeededSource::new(derive_seed(event_id) ^ base)),
            Self::Entropy => Box::new(SeededSource::new(rand::random())),
        }
    }
}

/// First eight bytes of `sha256(event_id)` as a big-endian u64.
fn derive_seed(event_id: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(event_id.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}
