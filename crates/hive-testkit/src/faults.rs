//! Collaborators that fail on purpose.

use async_trait::async_trait;
use hive_core::{HiveError, Page, Result};
use hive_journal::{AuditEntry, AuditLedger, AuditQuery};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Audit ledger whose appends always fail with a storage error.
///
/// Counts attempts so tests can tell "not attempted" from "attempted and lost".
#[derive(Debug, Default)]
pub struct FailingAuditLedger {
    attempts: AtomicUsize,
}

impl FailingAuditLedger {
    /// Ledger with no attempts recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends tried so far
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuditLedger for FailingAuditLedger {
    async fn append(&self, _entry: AuditEntry) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(HiveError::storage("audit ledger unavailable"))
    }

    async fn query(&self, query: &AuditQuery) -> Result<Page<AuditEntry>> {
        Ok(query.page.slice(Vec::new()))
    }
}
