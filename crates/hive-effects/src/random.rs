//! OS randomness handler.
//!
//! The only place `rand::thread_rng()` is used; everything else draws
//! randomness through `RandomEffects`.

#![allow(clippy::disallowed_methods)]

use async_trait::async_trait;
use hive_core::effects::RandomEffects;
use rand::RngCore;

/// Real random handler using the thread-local CSPRNG
#[derive(Debug, Clone, Default)]
pub struct RealRandomHandler;

impl RealRandomHandler {
    /// Create a new real random handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RandomEffects for RealRandomHandler {
    async fn random_bytes(&self, len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes
    }
}
