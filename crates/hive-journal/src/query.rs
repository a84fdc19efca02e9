//! Ledger filters.

use crate::entry::AuditEntry;
use hive_core::domain::{AuditAction, ObjectType};
use hive_core::{ActorId, PageRequest, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Filter over the ledger. Results are always newest first; entries with
/// equal timestamps come back in reverse append order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditQuery {
    /// Only entries about this kind of object
    pub object_type: Option<ObjectType>,
    /// Only entries about this object
    pub object_id: Option<Uuid>,
    /// Only entries by this actor
    pub actor: Option<ActorId>,
    /// Only entries with this action
    pub action: Option<AuditAction>,
    /// Page to return
    #[serde(default)]
    pub page: PageRequest,
}

impl AuditQuery {
    /// Everything, first page
    pub fn all() -> Self {
        Self::default()
    }

    /// The trail of one object
    pub fn for_object(object_type: ObjectType, object_id: impl Into<Uuid>) -> Self {
        Self {
            object_type: Some(object_type),
            object_id: Some(object_id.into()),
            ..Self::default()
        }
    }

    /// Everything one actor did
    pub fn by_actor(actor: ActorId) -> Self {
        Self {
            actor: Some(actor),
            ..Self::default()
        }
    }

    /// Restrict to one action.
    #[must_use]
    pub fn with_action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Select a page.
    #[must_use]
    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    /// Check the page bounds.
    pub fn validate(&self) -> Result<()> {
        self.page.validate()
    }

    /// Whether `entry` passes every present filter.
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.object_type.map_or(true, |t| entry.object_type == t)
            && self.object_id.map_or(true, |id| entry.object_id == Some(id))
            && self.actor.map_or(true, |a| entry.actor == Some(a))
            && self.action.map_or(true, |a| entry.action == a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ActorContext;
    use hive_core::domain::AuditDiff;
    use hive_core::{AuditEntryId, Timestamp};

    fn entry(action: AuditAction, object: u128, actor: Option<u128>) -> AuditEntry {
        let ctx = ActorContext {
            actor: actor.map(|a| ActorId(Uuid::from_u128(a))),
            ip: String::new(),
        };
        AuditEntry::record(
            AuditEntryId(Uuid::from_u128(99)),
            &ctx,
            action,
            ObjectType::Alert,
            Some(Uuid::from_u128(object)),
            AuditDiff::new(),
            Timestamp::default(),
        )
    }

    #[test]
    fn test_filters_combine() {
        let e = entry(AuditAction::Publish, 1, Some(5));

        assert!(AuditQuery::all().matches(&e));
        assert!(AuditQuery::for_object(ObjectType::Alert, Uuid::from_u128(1)).matches(&e));
        assert!(!AuditQuery::for_object(ObjectType::Report, Uuid::from_u128(1)).matches(&e));
        assert!(AuditQuery::by_actor(ActorId(Uuid::from_u128(5)))
            .with_action(AuditAction::Publish)
            .matches(&e));
        assert!(!AuditQuery::by_actor(ActorId(Uuid::from_u128(5)))
            .with_action(AuditAction::Withdraw)
            .matches(&e));
        assert!(!AuditQuery::by_actor(ActorId(Uuid::from_u128(6))).matches(&entry(
            AuditAction::Create,
            1,
            None
        )));
    }
}
