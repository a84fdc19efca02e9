//! Storage contracts consumed by the workflow.
//!
//! Lookups return `Ok(None)` for an absent entity; the workflow turns that
//! into `NotFound`. Implementations report their own failures as
//! `HiveError::Internal` (see [`HiveError::storage`]).
//!
//! [`HiveError::storage`]: hive_core::HiveError::storage

use crate::query::{AlertQuery, ReportQuery, TriageQuery};
use async_trait::async_trait;
use hive_core::domain::{Alert, Report, ReportStatus, TriageDecision};
use hive_core::{AlertId, DecisionId, Page, ReportId, Result, Timestamp};

/// Report storage
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Store a new report. Duplicate ids are a storage error.
    async fn insert_report(&self, report: Report) -> Result<()>;

    /// Report by id, `None` if absent.
    async fn get_report(&self, id: ReportId) -> Result<Option<Report>>;

    /// Filtered, sorted page of reports.
    async fn list_reports(&self, query: &ReportQuery) -> Result<Page<Report>>;
}

/// Triage decision storage
#[async_trait]
pub trait TriageRepository: Send + Sync {
    /// Append `decision` and set its report's status and `updated_at` as
    /// one write.
    ///
    /// Fails with `NotFound` and writes nothing when the report is absent.
    /// Returns the updated report.
    async fn record_decision(
        &self,
        decision: TriageDecision,
        new_status: ReportStatus,
        at: Timestamp,
    ) -> Result<Report>;

    /// Decision by id, `None` if absent.
    async fn get_decision(&self, id: DecisionId) -> Result<Option<TriageDecision>>;

    /// Filtered page of decisions, newest first.
    async fn list_decisions(&self, query: &TriageQuery) -> Result<Page<TriageDecision>>;
}

/// Alert storage
#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Store a new alert. Duplicate ids are a storage error.
    async fn insert_alert(&self, alert: Alert) -> Result<()>;

    /// Alert by id, `None` if absent.
    async fn get_alert(&self, id: AlertId) -> Result<Option<Alert>>;

    /// Replace a stored alert. `NotFound` if it was never inserted.
    async fn update_alert(&self, alert: Alert) -> Result<()>;

    /// Filtered page of alerts, newest first.
    async fn list_alerts(&self, query: &AlertQuery) -> Result<Page<Alert>>;

    /// Up to `limit` published alerts, most recently published first.
    async fn active_alerts(&self, limit: usize) -> Result<Vec<Alert>>;
}
