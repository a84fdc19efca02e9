//! Wall-clock effect.

use crate::errors::HiveError;
use crate::time::{PhysicalTime, Timestamp};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for time operations.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum TimeError {
    #[error("Time service unavailable")]
    ServiceUnavailable,
    #[error("Clock reading out of range: {ts_ms}ms")]
    OutOfRange { ts_ms: u64 },
    #[error("Operation failed: {reason}")]
    OperationFailed { reason: String },
}

impl From<TimeError> for HiveError {
    fn from(err: TimeError) -> Self {
        HiveError::internal(format!("time error: {err}"))
    }
}

/// Current UTC time.
#[async_trait]
pub trait PhysicalTimeEffects: Send + Sync {
    /// Read the wall clock.
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError>;

    /// Current time as an entity timestamp.
    async fn now(&self) -> Result<Timestamp, TimeError> {
        let reading = self.physical_time().await?;
        reading
            .to_timestamp()
            .ok_or(TimeError::OutOfRange { ts_ms: reading.ts_ms })
    }
}

/// Blanket implementation for Arc<T> where T: PhysicalTimeEffects
#[async_trait]
impl<T: PhysicalTimeEffects + ?Sized> PhysicalTimeEffects for std::sync::Arc<T> {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        (**self).physical_time().await
    }
}
