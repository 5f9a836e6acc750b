//! Environment abstraction for deterministic testing.
//!
//! The `Environment` trait decouples the assignment engine from the system
//! randomness source. This enables:
//!
//! - Deterministic Simulation: the harness provides a seeded RNG, so a failing
//!   draw can be replayed exactly from its seed.
//!
//! - Production Runtime: the CLI draws from OS entropy without any change to
//!   the engine.
//!
//! # Invariants
//!
//! - Determinism: Given the same seed, `random_bytes()` produces the same
//!   sequence
//! - Uniformity: `random_below(n)` returns every value in `0..n` with equal
//!   probability
//! - Isolation: Implementations must not share global state

/// Abstract environment providing randomness.
///
/// The engine never touches a global RNG. Every random choice it makes goes
/// through this trait.
pub trait Environment: Clone {
    /// Fills the provided buffer with random bytes.
    ///
    /// # Invariants
    ///
    /// - Determinism during simulations: Given the same RNG seed, this produces
    ///   the same sequence of bytes
    /// - Unpredictability in production: Uses OS entropy
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    /// Generates a uniformly distributed index in `0..bound`.
    ///
    /// Uses rejection sampling so that no index is favoured when `bound` does
    /// not divide `2^64`. Returns 0 when `bound` is 0 or 1.
    fn random_below(&self, bound: usize) -> usize {
        if bound <= 1 {
            return 0;
        }

        let bound = bound as u64;
        // Largest multiple of `bound` that fits in u64; values at or above it
        // would skew the distribution.
        let zone = u64::MAX - (u64::MAX % bound);

        loop {
            let value = self.random_u64();
            if value < zone {
                #[allow(clippy::cast_possible_truncation)]
                return (value % bound) as usize;
            }
        }
    }
}
