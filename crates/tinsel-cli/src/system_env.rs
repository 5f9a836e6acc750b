//! Production Environment implementation using OS randomness.
//!
//! This module provides `SystemEnv`, the production implementation of the
//! `Environment` trait. Draws are as unpredictable as the OS entropy pool.

use tinsel_core::Environment;

/// Production environment using OS entropy.
///
/// Uses `getrandom`, so nobody can reconstruct the draw from a seed or the
/// process start time.
#[derive(Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).unwrap_or_else(|e| {
            // NOTE: Should never fail on supported platforms. Falling back to
            // zeros keeps the draw valid but predictable, so say so loudly.
            tracing::error!("getrandom failed: {}", e);
            buffer.fill(0);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_env_random_bytes_are_random() {
        let env = SystemEnv::new();

        let mut bytes1 = [0u8; 32];
        let mut bytes2 = [0u8; 32];

        env.random_bytes(&mut bytes1);
        env.random_bytes(&mut bytes2);

        // Extremely unlikely to be equal if random
        assert_ne!(bytes1, bytes2, "Random bytes should differ");
    }

    #[test]
    fn system_env_random_below_stays_in_range() {
        let env = SystemEnv::new();

        for bound in 1..50 {
            assert!(env.random_below(bound) < bound);
        }
    }

    #[test]
    fn system_env_random_below_covers_range() {
        let env = SystemEnv::new();
        let mut seen = [false; 4];

        for _ in 0..1000 {
            seen[env.random_below(4)] = true;
        }

        assert!(seen.iter().all(|&s| s), "every index should appear");
    }
}
