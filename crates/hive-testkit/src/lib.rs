//! Hive Testing Infrastructure
//!
//! Deterministic effect handlers, entity fixtures, proptest strategies and
//! fault-injecting collaborators shared by the workspace's tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! hive-testkit = { path = "../hive-testkit" }
//! ```
//!
//! ```rust,no_run
//! use hive_testkit::*;
//!
//! # async fn demo() {
//! let effects = MockEffects::deterministic();
//! effects.advance_secs(60);
//! let report = fixtures::phishing_report();
//! # }
//! ```

pub mod faults;
pub mod fixtures;
pub mod mock_effects;
pub mod strategies;

pub use faults::FailingAuditLedger;
pub use mock_effects::{MockEffects, MOCK_START_MS};
