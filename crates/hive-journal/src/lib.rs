//! # Hive Journal - Layer 2: Audit Ledger Contract
//!
//! Every state-changing workflow operation leaves one [`AuditEntry`] behind.
//! The ledger is append-only: the [`AuditLedger`] trait has no update or
//! delete operation, so concurrent writers never conflict on it.
//!
//! Implementations live elsewhere (`hive-store` for the in-memory ledger,
//! `hive-testkit` for fault injection).

#![forbid(unsafe_code)]

pub mod entry;
pub mod ledger;
pub mod query;

pub use entry::{ActorContext, AuditEntry};
pub use ledger::AuditLedger;
pub use query::AuditQuery;
