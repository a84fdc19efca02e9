//! # Hive Core - Layer 1: Interface Types
//!
//! Shared vocabulary for the incident triage and alert-publication workflow.
//!
//! ## What Belongs Here
//!
//! - The unified [`HiveError`] and [`Result`]
//! - Entity identifiers, domain entities and their fixed enumerations
//! - Content hashing used for tamper evidence
//! - Effect traits for the clock and randomness (no implementations)
//! - Pagination types shared by every list operation
//!
//! ## What Does NOT Belong Here
//!
//! - Effect handlers (`hive-effects`, `hive-testkit`)
//! - Workflow logic and repository contracts (`hive-workflow`)
//! - Storage implementations (`hive-store`)

#![forbid(unsafe_code)]

pub mod domain;
pub mod effects;
pub mod errors;
pub mod hash;
pub mod identifiers;
pub mod query;
pub mod time;

pub use errors::{HiveError, Result};
pub use hash::Hash32;
pub use identifiers::{ActorId, AlertId, AuditEntryId, DecisionId, ReportId};
pub use query::{Page, PageRequest, SortDirection};
pub use time::{PhysicalTime, Timestamp};
