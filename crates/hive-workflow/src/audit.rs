//! Audit recording for committed workflow changes.

use crate::config::AuditPolicy;
use crate::effects::WorkflowEffects;
use hive_core::domain::{AuditAction, AuditDiff, ObjectType};
use hive_core::{AuditEntryId, HiveError, Result, Timestamp};
use hive_journal::{ActorContext, AuditEntry, AuditLedger};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Appends one ledger entry per committed change and applies the
/// configured [`AuditPolicy`] when the append fails.
#[derive(Clone)]
pub struct AuditRecorder {
    ledger: Arc<dyn AuditLedger>,
    policy: AuditPolicy,
}

impl std::fmt::Debug for AuditRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditRecorder")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl AuditRecorder {
    /// Recorder appending to `ledger` under `policy`.
    pub fn new(ledger: Arc<dyn AuditLedger>, policy: AuditPolicy) -> Self {
        Self { ledger, policy }
    }

    /// Ledger entries are appended to.
    pub fn ledger(&self) -> &Arc<dyn AuditLedger> {
        &self.ledger
    }

    /// Record `action` on one object, stamped with the operation's time.
    ///
    /// Called only after the primary write has committed. Under
    /// `BestEffort` a failed append is logged and swallowed.
    #[allow(clippy::too_many_arguments)]
    pub async fn record<E: WorkflowEffects + ?Sized>(
        &self,
        effects: &E,
        ctx: &ActorContext,
        action: AuditAction,
        object_type: ObjectType,
        object_id: Uuid,
        diff: AuditDiff,
        at: Timestamp,
    ) -> Result<()> {
        let id = AuditEntryId::from_uuid(effects.random_uuid().await);
        let entry = AuditEntry::record(id, ctx, action, object_type, Some(object_id), diff, at);

        match self.ledger.append(entry).await {
            Ok(()) => {
                debug!(audit_id = %id, %action, %object_type, %object_id, "audit entry appended");
                Ok(())
            }
            Err(err) => {
                warn!(
                    %action,
                    %object_type,
                    %object_id,
                    error = %err,
                    "audit append failed; change is committed without an audit entry"
                );
                match self.policy {
                    AuditPolicy::BestEffort => Ok(()),
                    AuditPolicy::Strict => Err(HiveError::internal(format!(
                        "audit append failed after commit: {err}"
                    ))),
                }
            }
        }
    }
}
