//! Randomness effect.

use async_trait::async_trait;
use uuid::Uuid;

/// Source of random bytes and random (v4) identifiers.
#[async_trait]
pub trait RandomEffects: Send + Sync {
    /// Fill a fresh buffer of `len` random bytes.
    async fn random_bytes(&self, len: usize) -> Vec<u8>;

    /// A version 4 UUID built from 16 random bytes.
    async fn random_uuid(&self) -> Uuid {
        let bytes = self.random_bytes(16).await;
        let mut raw = [0u8; 16];
        for (slot, byte) in raw.iter_mut().zip(bytes) {
            *slot = byte;
        }
        uuid::Builder::from_random_bytes(raw).into_uuid()
    }
}

/// Blanket implementation for Arc<T> where T: RandomEffects
#[async_trait]
impl<T: RandomEffects + ?Sized> RandomEffects for std::sync::Arc<T> {
    async fn random_bytes(&self, len: usize) -> Vec<u8> {
        (**self).random_bytes(len).await
    }

    async fn random_uuid(&self) -> Uuid {
        (**self).random_uuid().await
    }
}
