//! # Hive Effects - Layer 3: Production Handlers
//!
//! Stateless implementations of the effect traits from `hive-core` that
//! delegate to the operating system. Deterministic handlers for tests live in
//! `hive-testkit`, not here.

#![forbid(unsafe_code)]

pub mod random;
pub mod system;
pub mod time;

pub use random::RealRandomHandler;
pub use system::SystemEffects;
pub use time::RealTimeHandler;
