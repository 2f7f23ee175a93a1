use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::{Arc, Mutex, PoisonError};

/// Source of randomness for sampling and shuffling.
///
/// `Entropy` uses the thread-local generator, so concurrent callers never
/// contend. `Seeded` shares one deterministic stream between clones and is
/// meant for tests and reproducible runs.
#[derive(Debug, Clone, Default)]
pub enum Randomness {
    #[default]
    Entropy,
    Seeded(Arc<Mutex<StdRng>>),
}

impl Randomness {
    #[must_use]
    pub fn entropy() -> Self {
        Self::Entropy
    }

    /// Returns a deterministic source seeded with `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(Arc::new(Mutex::new(StdRng::seed_from_u64(seed))))
    }

    /// Runs `f` with a generator. Keep `f` short: a seeded source is locked for its duration.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut dyn RngCore) -> T) -> T {
        match self {
            Randomness::Entropy => f(&mut rand::rng()),
            Randomness::Seeded(rng) => {
                let mut guard = rng.lock().unwrap_or_else(PoisonError::into_inner);
                f(&mut *guard)
            }
        }
    }

    #[must_use]
    pub fn is_seeded(&self) -> bool {
        matches!(self, Randomness::Seeded(_))
    }
}
