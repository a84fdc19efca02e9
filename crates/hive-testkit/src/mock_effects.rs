//! Mock effects implementation for deterministic testing
//!
//! - Deterministic randomness using a seeded ChaCha20 RNG
//! - A clock that stands still until the test moves it
//!
//! Uses `std::sync::Mutex`; tests never hold the lock across an await.

#![allow(clippy::disallowed_types)]

use async_trait::async_trait;
use hive_core::effects::{PhysicalTimeEffects, RandomEffects, TimeError};
use hive_core::{PhysicalTime, Timestamp};
use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
use std::sync::{Arc, Mutex};

/// Fixed start: 2022-01-01 00:00:00 UTC
pub const MOCK_START_MS: u64 = 1640995200000;

/// Mock effects implementation for deterministic testing
///
/// Clones share state, so a test can keep a handle and advance the clock
/// seen by a workflow holding another clone.
#[derive(Debug, Clone)]
pub struct MockEffects {
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug)]
struct MockState {
    /// Deterministic RNG for reproducible tests
    rng: ChaCha20Rng,
    /// Physical time counter (deterministic)
    physical_time_ms: u64,
}

impl Default for MockEffects {
    fn default() -> Self {
        Self::deterministic()
    }
}

impl MockEffects {
    /// Create deterministic mock effects with fixed seed
    pub fn deterministic() -> Self {
        Self::with_seed([42; 32])
    }

    /// Create mock effects with specific seed for reproducible tests
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                rng: ChaCha20Rng::from_seed(seed),
                physical_time_ms: MOCK_START_MS,
            })),
        }
    }

    /// Move the clock forward.
    pub fn advance_ms(&self, ms: u64) {
        let mut state = self.state.lock().unwrap();
        state.physical_time_ms += ms;
    }

    /// Move the clock forward by whole seconds.
    pub fn advance_secs(&self, secs: u64) {
        self.advance_ms(secs * 1000);
    }

    /// Pin the clock to an exact reading.
    pub fn set_time(&self, ts_ms: u64) {
        self.state.lock().unwrap().physical_time_ms = ts_ms;
    }

    /// Current mock time as a timestamp.
    pub fn timestamp(&self) -> Timestamp {
        let ms = self.state.lock().unwrap().physical_time_ms;
        PhysicalTime::from_millis(ms).to_timestamp().unwrap()
    }
}

#[async_trait]
impl PhysicalTimeEffects for MockEffects {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        let state = self.state.lock().unwrap();
        Ok(PhysicalTime::from_millis(state.physical_time_ms))
    }
}

#[async_trait]
impl RandomEffects for MockEffects {
    async fn random_bytes(&self, len: usize) -> Vec<u8> {
        use rand::RngCore;
        let mut state = self.state.lock().unwrap();
        let mut bytes = vec![0u8; len];
        state.rng.fill_bytes(&mut bytes);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_seed_same_identifiers() {
        let a = MockEffects::deterministic();
        let b = MockEffects::deterministic();
        assert_eq!(a.random_uuid().await, b.random_uuid().await);
        assert_ne!(a.random_uuid().await, a.random_uuid().await);
    }

    #[tokio::test]
    async fn test_clock_moves_only_when_told() {
        let effects = MockEffects::deterministic();
        let shared = effects.clone();
        assert_eq!(effects.physical_time().await.unwrap().ts_ms, MOCK_START_MS);

        shared.advance_secs(2);
        assert_eq!(effects.physical_time().await.unwrap().ts_ms, MOCK_START_MS + 2000);

        effects.set_time(0);
        assert_eq!(effects.now().await.unwrap().timestamp(), 0);
    }
}
