//! Report submission and read access.
//!
//! A report's status is written here exactly once, at submission. Every
//! later change goes through [`TriageWorkflow`](crate::TriageWorkflow).

use crate::audit::AuditRecorder;
use crate::effects::WorkflowEffects;
use crate::query::ReportQuery;
use crate::repository::ReportRepository;
use hive_core::domain::{AuditAction, AuditDiff, NewReport, ObjectType, Report};
use hive_core::{HiveError, Page, ReportId, Result};
use hive_journal::ActorContext;
use std::sync::Arc;
use tracing::{debug, info};

/// Owns report creation; reads are delegated to the repository.
#[derive(Clone)]
pub struct ReportLifecycle {
    reports: Arc<dyn ReportRepository>,
    audit: AuditRecorder,
}

impl std::fmt::Debug for ReportLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportLifecycle")
            .field("audit", &self.audit)
            .finish_non_exhaustive()
    }
}

impl ReportLifecycle {
    /// Lifecycle over a report store.
    pub fn new(reports: Arc<dyn ReportRepository>, audit: AuditRecorder) -> Self {
        Self { reports, audit }
    }

    /// Submit a new report with status `submitted`.
    ///
    /// Submission is public: the audit entry carries the source address but
    /// never an actor.
    pub async fn create<E: WorkflowEffects + ?Sized>(
        &self,
        effects: &E,
        fields: NewReport,
        source_ip: &str,
    ) -> Result<Report> {
        fields.validate()?;

        let id = ReportId::from_uuid(effects.random_uuid().await);
        let now = effects.now().await?;
        let report = Report::submitted(id, fields, now);

        self.reports.insert_report(report.clone()).await?;
        info!(report_id = %id, category = %report.category, "report submitted");

        let diff = AuditDiff::new()
            .with("category", report.category.as_str())
            .with("status", report.status.as_str());
        self.audit
            .record(
                effects,
                &ActorContext::anonymous(source_ip),
                AuditAction::Create,
                ObjectType::Report,
                id.uuid(),
                diff,
                now,
            )
            .await?;

        Ok(report)
    }

    /// Load a report; `NotFound` if absent.
    pub async fn get(&self, id: ReportId) -> Result<Report> {
        debug!(report_id = %id, "loading report");
        self.reports
            .get_report(id)
            .await?
            .ok_or_else(|| HiveError::not_found("report", id))
    }

    /// Filtered, sorted page of reports.
    pub async fn list(&self, query: &ReportQuery) -> Result<Page<Report>> {
        query.validate()?;
        self.reports.list_reports(query).await
    }
}
