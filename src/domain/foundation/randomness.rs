//! Injectable randomness.
//!
//! Extraction-probe timing and fallback-reply selection are stochastic.
//! Everything that rolls dice takes a `&dyn RandomSource` so tests can pin
//! the outcome while production draws from the thread-local generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Source of the two random decisions the engagement core makes.
pub trait RandomSource: Send + Sync {
    /// Returns true with the given probability.
    ///
    /// Probabilities at or below 0 never fire, at or above 1 always fire.
    fn chance(&self, probability: f64) -> bool;

    /// Returns a uniformly chosen index in `0..len`. `len` must be non-zero.
    fn index(&self, len: usize) -> usize;
}

/// Picks one element uniformly, or `None` for an empty slice.
pub fn choose<'a, T>(rng: &dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.index(items.len()))
}

fn normalized(probability: f64) -> Option<bool> {
    if probability.is_nan() || probability <= 0.0 {
        Some(false)
    } else if probability >= 1.0 {
        Some(true)
    } else {
        None
    }
}

/// Production source backed by `rand::thread_rng`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn chance(&self, probability: f64) -> bool {
        normalized(probability).unwrap_or_else(|| rand::thread_rng().gen_bool(probability))
    }

    fn index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Reproducible source seeded once, for simulations and replays.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// Creates a source from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn chance(&self, probability: f64) -> bool {
        if let Some(decided) = normalized(probability) {
            return decided;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_bool(probability)
    }

    fn index(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(0..len)
    }
}

/// Deterministic source: every coin flip has the same outcome and every
/// pick lands on the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRandom {
    flip: bool,
    slot: usize,
}

impl FixedRandom {
    /// Coin flips always succeed (for any probability above zero).
    pub fn always() -> Self {
        Self { flip: true, slot: 0 }
    }

    /// Coin flips never succeed (for any probability below one).
    pub fn never() -> Self {
        Self { flip: false, slot: 0 }
    }

    /// Picks land on `slot`, wrapped to the slice length.
    pub fn with_slot(mut self, slot: usize) -> Self {
        self.slot = slot;
        self
    }
}

impl RandomSource for FixedRandom {
    fn chance(&self, probability: f64) -> bool {
        normalized(probability).unwrap_or(self.flip)
    }

    fn index(&self, len: usize) -> usize {
        self.slot % len
    }
}
