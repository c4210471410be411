//! Injectable sources of uniform random draws.
//!
//! Sampling never touches a global RNG directly. Callers pass a
//! [`RandomSource`]: a seeded PCG generator for reproducible runs, a
//! [`FixedDraws`] list for tests, or the process-wide source behind
//! [`with_shared_source`].

use std::sync::{Mutex, OnceLock};

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

/// A capability that yields uniform draws in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

/// PCG-backed random source.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: Mcg128Xsl64,
}

impl SeededSource {
    /// Create a reproducible source from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mcg128Xsl64::seed_from_u64(seed),
        }
    }

    /// Create a source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mcg128Xsl64::from_entropy(),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Values are clamped into `[0, 1)` so a test can never hand the sampler an
/// out-of-contract draw.
#[derive(Debug, Clone)]
pub struct FixedDraws {
    draws: Vec<f64>,
    cursor: usize,
}

impl FixedDraws {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, cursor: 0 }
    }

    /// A source that always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for FixedDraws {
    fn next_unit(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

static SHARED: OnceLock<Mutex<SeededSource>> = OnceLock::new();

fn shared() -> &'static Mutex<SeededSource> {
    SHARED.get_or_init(|| Mutex::new(SeededSource::from_entropy()))
}

/// Run `f` with exclusive access to the process-wide source.
///
/// The lock is held for the whole closure, so the draws of one generation call
/// never interleave with another caller's.
pub fn with_shared_source<R>(f: impl FnOnce(&mut dyn RandomSource) -> R) -> R {
    let mut guard = shared().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut *guard)
}

/// Replace the process-wide source with a seeded one.
pub fn reseed_shared(seed: u64) {
    let mut guard = shared().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = SeededSource::from_seed(seed);
}
