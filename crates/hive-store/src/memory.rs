//! In-memory repositories.

use async_trait::async_trait;
use hive_core::domain::{Alert, AlertStatus, Report, ReportStatus, TriageDecision};
use hive_core::{AlertId, DecisionId, HiveError, Page, ReportId, Result, SortDirection, Timestamp};
use hive_workflow::query::{order_by, AlertQuery, ReportQuery, TriageQuery};
use hive_workflow::{AlertRepository, ReportRepository, TriageRepository};
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::trace;

#[derive(Debug, Default)]
struct StoreState {
    reports: IndexMap<ReportId, Report>,
    decisions: IndexMap<DecisionId, TriageDecision>,
    alerts: IndexMap<AlertId, Alert>,
}

/// Memory-backed store for reports, triage decisions and alerts.
///
/// Maps keep insertion order, which is the tie-breaker for every listing.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored reports (for tests)
    pub async fn report_count(&self) -> usize {
        self.state.read().await.reports.len()
    }

    /// Stored triage decisions (for tests)
    pub async fn decision_count(&self) -> usize {
        self.state.read().await.decisions.len()
    }

    /// Stored alerts (for tests)
    pub async fn alert_count(&self) -> usize {
        self.state.read().await.alerts.len()
    }
}

/// Filter, order and page a map's values.
fn select<K, T: Clone>(
    map: &IndexMap<K, T>,
    keep: impl Fn(&T) -> bool,
    direction: SortDirection,
    cmp: impl Fn(&T, &T) -> std::cmp::Ordering,
) -> Vec<T> {
    let mut hits: Vec<(usize, &T)> = map
        .values()
        .enumerate()
        .filter(|(_, item)| keep(*item))
        .collect();
    order_by(&mut hits, direction, |a, b| cmp(*a, *b));
    hits.into_iter().map(|(_, item)| item.clone()).collect()
}

#[async_trait]
impl ReportRepository for MemoryStore {
    async fn insert_report(&self, report: Report) -> Result<()> {
        let mut state = self.state.write().await;
        if state.reports.contains_key(&report.id) {
            return Err(HiveError::storage(format!("duplicate report id {}", report.id)));
        }
        trace!(report_id = %report.id, "storing report");
        state.reports.insert(report.id, report);
        Ok(())
    }

    async fn get_report(&self, id: ReportId) -> Result<Option<Report>> {
        Ok(self.state.read().await.reports.get(&id).cloned())
    }

    async fn list_reports(&self, query: &ReportQuery) -> Result<Page<Report>> {
        let state = self.state.read().await;
        let hits = select(
            &state.reports,
            |r| query.matches(r),
            query.direction,
            |a, b| query.compare(a, b),
        );
        Ok(query.page.slice(hits))
    }
}

#[async_trait]
impl TriageRepository for MemoryStore {
    async fn record_decision(
        &self,
        decision: TriageDecision,
        new_status: ReportStatus,
        at: Timestamp,
    ) -> Result<Report> {
        let mut state = self.state.write().await;
        if state.decisions.contains_key(&decision.id) {
            return Err(HiveError::storage(format!(
                "duplicate triage decision id {}",
                decision.id
            )));
        }
        let report = state
            .reports
            .get_mut(&decision.report_id)
            .ok_or_else(|| HiveError::not_found("report", decision.report_id))?;
        report.status = new_status;
        report.updated_at = at;
        let updated = report.clone();

        trace!(decision_id = %decision.id, report_id = %decision.report_id, "storing decision");
        state.decisions.insert(decision.id, decision);
        Ok(updated)
    }

    async fn get_decision(&self, id: DecisionId) -> Result<Option<TriageDecision>> {
        Ok(self.state.read().await.decisions.get(&id).cloned())
    }

    async fn list_decisions(&self, query: &TriageQuery) -> Result<Page<TriageDecision>> {
        let state = self.state.read().await;
        let hits = select(
            &state.decisions,
            |d| query.matches(d),
            SortDirection::Desc,
            TriageQuery::compare,
        );
        Ok(query.page.slice(hits))
    }
}

#[async_trait]
impl AlertRepository for MemoryStore {
    async fn insert_alert(&self, alert: Alert) -> Result<()> {
        let mut state = self.state.write().await;
        if state.alerts.contains_key(&alert.id) {
            return Err(HiveError::storage(format!("duplicate alert id {}", alert.id)));
        }
        trace!(alert_id = %alert.id, "storing alert");
        state.alerts.insert(alert.id, alert);
        Ok(())
    }

    async fn get_alert(&self, id: AlertId) -> Result<Option<Alert>> {
        Ok(self.state.read().await.alerts.get(&id).cloned())
    }

    async fn update_alert(&self, alert: Alert) -> Result<()> {
        let mut state = self.state.write().await;
        let slot = state
            .alerts
            .get_mut(&alert.id)
            .ok_or_else(|| HiveError::not_found("alert", alert.id))?;
        *slot = alert;
        Ok(())
    }

    async fn list_alerts(&self, query: &AlertQuery) -> Result<Page<Alert>> {
        let state = self.state.read().await;
        let hits = select(
            &state.alerts,
            |a| query.matches(a),
            SortDirection::Desc,
            AlertQuery::compare,
        );
        Ok(query.page.slice(hits))
    }

    async fn active_alerts(&self, limit: usize) -> Result<Vec<Alert>> {
        let state = self.state.read().await;
        let mut hits = select(
            &state.alerts,
            |a| a.status == AlertStatus::Published,
            SortDirection::Desc,
            AlertQuery::compare_published,
        );
        hits.truncate(limit);
        Ok(hits)
    }
}
