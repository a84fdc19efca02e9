//! In-memory audit ledger.

use async_trait::async_trait;
use hive_core::{Page, Result, SortDirection};
use hive_journal::{AuditEntry, AuditLedger, AuditQuery};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Append-only vector of entries in append order.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLedger {
    entries: Arc<RwLock<Vec<AuditEntry>>>,
}

impl MemoryAuditLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries appended so far
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing has been appended.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Every entry in append order (for tests and exports)
    pub async fn snapshot(&self) -> Vec<AuditEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl AuditLedger for MemoryAuditLedger {
    async fn append(&self, entry: AuditEntry) -> Result<()> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn query(&self, query: &AuditQuery) -> Result<Page<AuditEntry>> {
        query.validate()?;
        let entries = self.entries.read().await;
        let mut hits: Vec<(usize, &AuditEntry)> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| query.matches(*entry))
            .collect();
        hive_workflow::query::order_by(&mut hits, SortDirection::Desc, |a, b| {
            a.timestamp.cmp(&b.timestamp)
        });
        Ok(query
            .page
            .slice(hits.into_iter().map(|(_, entry)| entry.clone()).collect()))
    }
}
