//! Alert drafting, publication and withdrawal.
//!
//! Every update walks the same path while holding the alert's lock:
//! load, check the transition table, overlay content, apply transition side
//! effects, regenerate the CAP document, persist, audit. A rejected
//! transition returns before anything is written.

use crate::audit::AuditRecorder;
use crate::effects::WorkflowEffects;
use crate::locks::EntityLocks;
use crate::query::{validate_limit, AlertQuery};
use crate::repository::AlertRepository;
use hive_cap::{CapContent, CapEncoder};
use hive_core::domain::{
    Alert, AlertPatch, AlertStatus, AuditAction, AuditDiff, NewAlert, ObjectType,
};
use hive_core::{AlertId, HiveError, Page, Result, Timestamp};
use hive_journal::ActorContext;
use std::sync::Arc;
use tracing::{debug, info};

/// Owns alert state transitions and CAP regeneration.
#[derive(Clone)]
pub struct AlertLifecycle {
    alerts: Arc<dyn AlertRepository>,
    encoder: CapEncoder,
    locks: EntityLocks,
    audit: AuditRecorder,
}

impl std::fmt::Debug for AlertLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertLifecycle")
            .field("encoder", &self.encoder)
            .field("audit", &self.audit)
            .finish_non_exhaustive()
    }
}

/// Audit action for a status change, `update` when there was none.
fn transition_action(target: Option<AlertStatus>) -> AuditAction {
    match target {
        Some(AlertStatus::Approved) => AuditAction::Approve,
        Some(AlertStatus::Published) => AuditAction::Publish,
        Some(AlertStatus::Withdrawn) => AuditAction::Withdraw,
        Some(AlertStatus::Draft) | None => AuditAction::Update,
    }
}

impl AlertLifecycle {
    /// Lifecycle over an alert store.
    pub fn new(
        alerts: Arc<dyn AlertRepository>,
        encoder: CapEncoder,
        locks: EntityLocks,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            alerts,
            encoder,
            locks,
            audit,
        }
    }

    /// CAP document for the alert's current content, with a fresh
    /// identifier and `sent` = `at`.
    async fn render<E: WorkflowEffects + ?Sized>(
        &self,
        effects: &E,
        alert: &Alert,
        at: &Timestamp,
    ) -> String {
        let identifier = effects.random_uuid().await;
        self.encoder
            .encode_at(identifier, at, &CapContent::from_alert(alert))
    }

    /// Draft a new alert.
    ///
    /// The originating report is recorded as given; it is not looked up.
    pub async fn create<E: WorkflowEffects + ?Sized>(
        &self,
        effects: &E,
        fields: NewAlert,
        ctx: &ActorContext,
    ) -> Result<Alert> {
        fields.validate()?;

        let id = AlertId::from_uuid(effects.random_uuid().await);
        let now = effects.now().await?;
        let mut alert = Alert::drafted(id, fields, String::new(), now);
        let cap_xml = self.render(effects, &alert, &now).await;
        alert.cap_xml = cap_xml;

        self.alerts.insert_alert(alert.clone()).await?;
        info!(alert_id = %id, event = %alert.event, "alert drafted");

        let diff = AuditDiff::new()
            .with("event", alert.event.clone())
            .with("severity", alert.severity.as_str())
            .with("status", alert.status.as_str());
        self.audit
            .record(
                effects,
                ctx,
                AuditAction::Create,
                ObjectType::Alert,
                id.uuid(),
                diff,
                now,
            )
            .await?;

        Ok(alert)
    }

    /// Apply a partial update, optionally moving the alert to a new status.
    ///
    /// Targeting the current status is not a transition: no side effects,
    /// audit action `update`.
    ///
    /// # Errors
    /// * `Validation` for a present-but-invalid content field
    /// * `NotFound` if the alert does not exist
    /// * `InvalidTransition` if the table forbids the status change; the
    ///   stored alert is unchanged
    pub async fn update<E: WorkflowEffects + ?Sized>(
        &self,
        effects: &E,
        id: AlertId,
        patch: AlertPatch,
        ctx: &ActorContext,
    ) -> Result<Alert> {
        patch.validate()?;
        let _guard = self.locks.lock(id).await;

        let mut alert = self
            .alerts
            .get_alert(id)
            .await?
            .ok_or_else(|| HiveError::not_found("alert", id))?;

        let from = alert.status;
        let target = patch.status.filter(|to| *to != from);
        if let Some(to) = target {
            if !from.can_transition_to(to) {
                debug!(alert_id = %id, %from, %to, "transition rejected");
                return Err(HiveError::invalid_transition(from, to));
            }
        }

        let changed = alert.apply_content(&patch);
        let now = effects.now().await?;

        if let Some(to) = target {
            alert.status = to;
            match to {
                AlertStatus::Approved => alert.approved_by = ctx.actor,
                AlertStatus::Published => alert.published_at = Some(now),
                AlertStatus::Draft | AlertStatus::Withdrawn => {}
            }
        }

        let cap_xml = self.render(effects, &alert, &now).await;
        alert.cap_xml = cap_xml;
        alert.updated_at = now;

        self.alerts.update_alert(alert.clone()).await?;
        info!(
            alert_id = %id,
            from = %from,
            to = %alert.status,
            changed = changed.len(),
            "alert updated"
        );

        let mut diff = AuditDiff::new();
        if let Some(to) = target {
            diff.insert(
                "status",
                AuditDiff::new().with("from", from.as_str()).with("to", to.as_str()),
            );
        }
        if !changed.is_empty() {
            diff.insert("fields", changed);
        }
        self.audit
            .record(
                effects,
                ctx,
                transition_action(target),
                ObjectType::Alert,
                id.uuid(),
                diff,
                now,
            )
            .await?;

        Ok(alert)
    }

    /// Load an alert; `NotFound` if absent.
    pub async fn get(&self, id: AlertId) -> Result<Alert> {
        debug!(alert_id = %id, "loading alert");
        self.alerts
            .get_alert(id)
            .await?
            .ok_or_else(|| HiveError::not_found("alert", id))
    }

    /// Filtered page of alerts, newest first.
    pub async fn list(&self, query: &AlertQuery) -> Result<Page<Alert>> {
        query.validate()?;
        self.alerts.list_alerts(query).await
    }

    /// Published alerts, most recently published first.
    pub async fn active(&self, limit: usize) -> Result<Vec<Alert>> {
        validate_limit(limit)?;
        self.alerts.active_alerts(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_actions() {
        assert_eq!(transition_action(Some(AlertStatus::Approved)), AuditAction::Approve);
        assert_eq!(transition_action(Some(AlertStatus::Published)), AuditAction::Publish);
        assert_eq!(transition_action(Some(AlertStatus::Withdrawn)), AuditAction::Withdraw);
        assert_eq!(transition_action(Some(AlertStatus::Draft)), AuditAction::Update);
        assert_eq!(transition_action(None), AuditAction::Update);
    }
}
