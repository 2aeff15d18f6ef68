//! Random nonce source.

use crate::domain::{Nonce, NONCE_LEN};
use crate::ports::NonceSource;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Draws nonces from a seeded `StdRng` behind a mutex, so concurrent calls
/// never observe the same generator state.
pub struct RandomNonceSource {
    rng: Mutex<StdRng>,
}

impl RandomNonceSource {
    /// Seed from the operating system.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomNonceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceSource for RandomNonceSource {
    fn next_nonce(&self) -> Nonce {
        let mut bytes = [0u8; NONCE_LEN];
        self.rng.lock().fill_bytes(&mut bytes);
        Nonce::new(bytes)
    }
}
