//! Wall-clock time values and their fixed text renderings
//!
//! Entities carry `Timestamp` (UTC, millisecond precision from the clock
//! effect). Two renderings are part of persisted contracts and must not
//! change: the second-precision form hashed into triage decisions and the
//! CAP `sent` form.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// UTC timestamp stored on entities
pub type Timestamp = DateTime<Utc>;

/// Wall-clock reading produced by `PhysicalTimeEffects`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhysicalTime {
    /// Milliseconds since the Unix epoch
    pub ts_ms: u64,
}

impl PhysicalTime {
    /// Reading at the given epoch milliseconds
    pub fn from_millis(ts_ms: u64) -> Self {
        Self { ts_ms }
    }

    /// Convert to a UTC timestamp, `None` when out of chrono's range
    pub fn to_timestamp(self) -> Option<Timestamp> {
        let ms = i64::try_from(self.ts_ms).ok()?;
        DateTime::from_timestamp_millis(ms)
    }
}

/// `YYYY-MM-DDTHH:MM:SSZ`, the rendering hashed into triage decisions.
pub fn canonical_seconds(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `YYYY-MM-DDTHH:MM:SS+00:00`, the CAP 1.2 `dateTime` rendering.
///
/// CAP forbids the `Z` designator, so the offset is always spelled out.
pub fn cap_date_time(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, false)
}
