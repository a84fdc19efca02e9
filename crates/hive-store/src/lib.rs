//! # Hive Store - Layer 3: In-Memory Storage
//!
//! One authoritative in-process store implementing every workflow
//! repository, and an in-memory append-only audit ledger.
//!
//! State sits behind `Arc<tokio::sync::RwLock<..>>`; clones share it.

#![forbid(unsafe_code)]

pub mod ledger;
pub mod memory;

pub use ledger::MemoryAuditLedger;
pub use memory::MemoryStore;
