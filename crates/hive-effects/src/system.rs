//! Combined production handler.

use crate::random::RealRandomHandler;
use crate::time::RealTimeHandler;
use async_trait::async_trait;
use hive_core::effects::{PhysicalTimeEffects, RandomEffects, TimeError};
use hive_core::PhysicalTime;

/// Clock and randomness from the operating system, in one value the
/// workflow can hold.
#[derive(Debug, Clone, Default)]
pub struct SystemEffects {
    time: RealTimeHandler,
    random: RealRandomHandler,
}

impl SystemEffects {
    /// Handlers backed by the OS clock and RNG.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PhysicalTimeEffects for SystemEffects {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        self.time.physical_time().await
    }
}

#[async_trait]
impl RandomEffects for SystemEffects {
    async fn random_bytes(&self, len: usize) -> Vec<u8> {
        self.random.random_bytes(len).await
    }
}
