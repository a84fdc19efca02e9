//! The ledger contract.

use crate::entry::AuditEntry;
use crate::query::AuditQuery;
use async_trait::async_trait;
use hive_core::{Page, Result};
use std::sync::Arc;

/// Append-only audit sink with read access for review.
///
/// Entries are never changed or removed once appended.
#[async_trait]
pub trait AuditLedger: Send + Sync {
    /// Persist one entry. Storage failures surface as `Internal`.
    async fn append(&self, entry: AuditEntry) -> Result<()>;

    /// Entries matching `query`, newest first.
    async fn query(&self, query: &AuditQuery) -> Result<Page<AuditEntry>>;
}

/// Blanket implementation for Arc<T> where T: AuditLedger
#[async_trait]
impl<T: AuditLedger + ?Sized> AuditLedger for Arc<T> {
    async fn append(&self, entry: AuditEntry) -> Result<()> {
        (**self).append(entry).await
    }

    async fn query(&self, query: &AuditQuery) -> Result<Page<AuditEntry>> {
        (**self).query(query).await
    }
}
