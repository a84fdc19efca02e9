//! Engine facade.
//!
//! Wires the three workflow components over one store, one ledger and one
//! lock registry, and holds the effects handler so callers do not pass it on
//! every call.

use crate::alert::AlertLifecycle;
use crate::audit::AuditRecorder;
use crate::config::WorkflowConfig;
use crate::effects::WorkflowEffects;
use crate::locks::EntityLocks;
use crate::query::{AlertQuery, ReportQuery, TriageQuery};
use crate::report::ReportLifecycle;
use crate::repository::{AlertRepository, ReportRepository, TriageRepository};
use crate::triage::TriageWorkflow;
use hive_cap::CapEncoder;
use hive_core::domain::{
    Alert, AlertPatch, NewAlert, NewReport, Report, TriageDecision, TriageInput,
};
use hive_core::{AlertId, Page, ReportId, Result};
use hive_journal::{ActorContext, AuditEntry, AuditLedger, AuditQuery};
use std::sync::Arc;

/// Single entry point for transports and tools.
pub struct Engine<E> {
    effects: E,
    reports: ReportLifecycle,
    triage: TriageWorkflow,
    alerts: AlertLifecycle,
    ledger: Arc<dyn AuditLedger>,
    config: WorkflowConfig,
}

impl<E> std::fmt::Debug for Engine<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E: WorkflowEffects> Engine<E> {
    /// Build an engine over a store implementing every repository.
    pub fn new<S>(
        effects: E,
        store: Arc<S>,
        ledger: Arc<dyn AuditLedger>,
        config: WorkflowConfig,
    ) -> Result<Self>
    where
        S: ReportRepository + TriageRepository + AlertRepository + 'static,
    {
        config.validate()?;
        let locks = EntityLocks::new();
        let audit = AuditRecorder::new(ledger.clone(), config.audit_policy);

        let report_repo: Arc<dyn ReportRepository> = store.clone();
        let triage_repo: Arc<dyn TriageRepository> = store.clone();
        let alert_repo: Arc<dyn AlertRepository> = store;

        Ok(Self {
            effects,
            reports: ReportLifecycle::new(report_repo.clone(), audit.clone()),
            triage: TriageWorkflow::new(report_repo, triage_repo, locks.clone(), audit.clone()),
            alerts: AlertLifecycle::new(
                alert_repo,
                CapEncoder::new(config.cap_sender.clone()),
                locks,
                audit,
            ),
            ledger,
            config,
        })
    }

    /// Effects handler used for every operation.
    pub fn effects(&self) -> &E {
        &self.effects
    }

    /// Configuration the engine was built with.
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Report lifecycle component.
    pub fn reports(&self) -> &ReportLifecycle {
        &self.reports
    }

    /// Triage component.
    pub fn triage(&self) -> &TriageWorkflow {
        &self.triage
    }

    /// Alert lifecycle component.
    pub fn alerts(&self) -> &AlertLifecycle {
        &self.alerts
    }

    /// Submit a report from `source_ip`.
    pub async fn submit_report(&self, fields: NewReport, source_ip: &str) -> Result<Report> {
        self.reports.create(&self.effects, fields, source_ip).await
    }

    /// Load a report.
    pub async fn report(&self, id: ReportId) -> Result<Report> {
        self.reports.get(id).await
    }

    /// Filtered, sorted page of reports.
    pub async fn list_reports(&self, query: &ReportQuery) -> Result<Page<Report>> {
        self.reports.list(query).await
    }

    /// Record a triage decision on a report.
    pub async fn decide(
        &self,
        report_id: ReportId,
        input: TriageInput,
        ctx: &ActorContext,
    ) -> Result<TriageDecision> {
        self.triage.decide(&self.effects, report_id, input, ctx).await
    }

    /// Filtered page of decisions, newest first.
    pub async fn list_decisions(&self, query: &TriageQuery) -> Result<Page<TriageDecision>> {
        self.triage.list(query).await
    }

    /// Every decision on a report, newest first.
    pub async fn decisions_for(&self, report_id: ReportId) -> Result<Vec<TriageDecision>> {
        self.triage.decisions_for(report_id).await
    }

    /// Decision currently setting a report's status.
    pub async fn latest_decision(&self, report_id: ReportId) -> Result<Option<TriageDecision>> {
        self.triage.latest_for(report_id).await
    }

    /// Draft an alert.
    pub async fn create_alert(&self, fields: NewAlert, ctx: &ActorContext) -> Result<Alert> {
        self.alerts.create(&self.effects, fields, ctx).await
    }

    /// Patch an alert, optionally changing its status.
    pub async fn update_alert(
        &self,
        id: AlertId,
        patch: AlertPatch,
        ctx: &ActorContext,
    ) -> Result<Alert> {
        self.alerts.update(&self.effects, id, patch, ctx).await
    }

    /// Load an alert.
    pub async fn alert(&self, id: AlertId) -> Result<Alert> {
        self.alerts.get(id).await
    }

    /// Filtered page of alerts, newest first.
    pub async fn list_alerts(&self, query: &AlertQuery) -> Result<Page<Alert>> {
        self.alerts.list(query).await
    }

    /// Published alerts, most recently published first.
    pub async fn active_alerts(&self, limit: usize) -> Result<Vec<Alert>> {
        self.alerts.active(limit).await
    }

    /// Audit entries matching `query`, newest first.
    pub async fn audit_trail(&self, query: &AuditQuery) -> Result<Page<AuditEntry>> {
        query.validate()?;
        self.ledger.query(query).await
    }
}
