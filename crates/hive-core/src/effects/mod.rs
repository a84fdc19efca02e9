//! Effect interfaces consumed by the workflow
//!
//! The workflow never reads the system clock or system randomness directly.
//! Both arrive through these traits so identifiers and timestamps are
//! deterministic under test. Production handlers live in `hive-effects`,
//! deterministic ones in `hive-testkit`.

pub mod random;
pub mod time;

pub use random::RandomEffects;
pub use time::{PhysicalTimeEffects, TimeError};
