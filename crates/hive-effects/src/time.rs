//! System clock handler.

use async_trait::async_trait;
use hive_core::effects::{PhysicalTimeEffects, TimeError};
use hive_core::PhysicalTime;
use std::time::{SystemTime, UNIX_EPOCH};

/// Real time handler for production use
#[derive(Debug, Clone, Default)]
pub struct RealTimeHandler;

impl RealTimeHandler {
    /// Create a new real time handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PhysicalTimeEffects for RealTimeHandler {
    #[allow(clippy::disallowed_methods)]
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        // SystemTime::now() is only read here, behind the effect trait.
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TimeError::OperationFailed {
                reason: format!("system clock before Unix epoch: {e}"),
            })?;
        let ts_ms = u64::try_from(elapsed.as_millis()).map_err(|_| TimeError::OperationFailed {
            reason: "system clock overflow".to_string(),
        })?;
        Ok(PhysicalTime::from_millis(ts_ms))
    }
}
