//! Nullable random: deterministic randomness for ephemeral keys and nonces.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_core::{CryptoRng, RngCore};

/// A seeded random source.
///
/// Marked [`CryptoRng`] so it can stand in for the system source in tests. Never use
/// it outside tests.
pub struct NullRandom {
    inner: Source,
}

enum Source {
    Seeded(StdRng),
    Constant(u8),
}

impl NullRandom {
    /// Same seed, same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Source::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    /// Every byte produced is `value`.
    pub fn constant(value: u8) -> Self {
        Self {
            inner: Source::Constant(value),
        }
    }
}

impl RngCore for NullRandom {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match &mut self.inner {
            Source::Seeded(rng) => rng.fill_bytes(dest),
            Source::Constant(value) => dest.fill(*value),
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for NullRandom {}
