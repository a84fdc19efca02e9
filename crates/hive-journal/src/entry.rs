//! Ledger entries and the caller identity attached to them.

use hive_core::domain::{AuditAction, AuditDiff, ObjectType};
use hive_core::{ActorId, AuditEntryId, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who triggered an operation, as supplied by the transport layer.
///
/// The actor is optional (anonymous report submission); the source address
/// is always recorded, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    /// Acting staff member, `None` for anonymous callers
    pub actor: Option<ActorId>,
    /// Caller network address
    pub ip: String,
}

impl ActorContext {
    /// Identified caller
    pub fn new(actor: ActorId, ip: impl Into<String>) -> Self {
        Self {
            actor: Some(actor),
            ip: ip.into(),
        }
    }

    /// Caller without an identity
    pub fn anonymous(ip: impl Into<String>) -> Self {
        Self {
            actor: None,
            ip: ip.into(),
        }
    }

    /// Internal caller with neither identity nor address
    pub fn system() -> Self {
        Self::default()
    }
}

/// One immutable record in the audit ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Entry identifier
    pub id: AuditEntryId,
    /// Acting staff member, `None` for anonymous or system actions
    pub actor: Option<ActorId>,
    /// Network address of the caller
    pub actor_ip: String,
    /// What was done
    pub action: AuditAction,
    /// Kind of object acted on
    pub object_type: ObjectType,
    /// Object acted on, if it has an id
    pub object_id: Option<Uuid>,
    /// Summary of the change
    pub diff: AuditDiff,
    /// When the action was committed
    pub timestamp: Timestamp,
}

impl AuditEntry {
    /// Build an entry for an action by `ctx` on one object.
    pub fn record(
        id: AuditEntryId,
        ctx: &ActorContext,
        action: AuditAction,
        object_type: ObjectType,
        object_id: Option<Uuid>,
        diff: AuditDiff,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            actor: ctx.actor,
            actor_ip: ctx.ip.clone(),
            action,
            object_type,
            object_id,
            diff,
            timestamp,
        }
    }

    /// Whether this entry refers to the given object.
    pub fn concerns(&self, object_type: ObjectType, object_id: Uuid) -> bool {
        self.object_type == object_type && self.object_id == Some(object_id)
    }
}
