//! `hive scenario`: replay labelled workflow steps against an in-memory
//! engine and dump the resulting state.
//!
//! ```toml
//! name = "phishing wave"
//!
//! [[step]]
//! label = "submit"
//! action = "submit_report"
//! source_ip = "198.51.100.23"
//! report = { category = "scam_phishing", area_hint = "Campus X", description = "..." }
//!
//! [[step]]
//! label = "triage"
//! action = "triage"
//! actor = "00000000-0000-0000-0000-000000000007"
//! report = "submit"
//! input = { decision = "accept", severity_final = "S2" }
//!
//! [[step]]
//! label = "back-to-draft"
//! action = "update_alert"
//! alert = "draft"
//! patch = { status = "draft" }
//! expect_error = "invalid_transition"
//! ```
//!
//! Later steps refer to entities created by earlier ones through their
//! labels.

use anyhow::{anyhow, bail, Context, Result};
use hive_core::domain::{Alert, AlertPatch, NewAlert, NewReport, Report, TriageDecision, TriageInput};
use hive_core::query::MAX_PAGE_SIZE;
use hive_core::{ActorId, AlertId, HiveError, Page, PageRequest, ReportId};
use hive_journal::{ActorContext, AuditEntry, AuditQuery};
use hive_store::{MemoryAuditLedger, MemoryStore};
use hive_workflow::{AlertQuery, Engine, ReportQuery, TriageQuery, WorkflowConfig, WorkflowEffects};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Named list of workflow steps, read from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Free-form scenario name
    #[serde(default)]
    pub name: Option<String>,
    /// `[[step]]` tables in replay order
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

/// One labelled workflow call
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Unique label; later steps refer to this step by it
    pub label: String,
    /// Acting staff member, absent for anonymous calls
    #[serde(default)]
    pub actor: Option<ActorId>,
    /// Caller network address recorded in the audit trail
    #[serde(default)]
    pub source_ip: String,
    /// Error kind this step is expected to fail with
    #[serde(default)]
    pub expect_error: Option<ErrorKind>,
    /// What the step does
    #[serde(flatten)]
    pub action: StepAction,
}

/// Workflow operation performed by a step
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    /// Submit a report
    SubmitReport {
        /// Report fields
        report: NewReport,
    },
    /// Record a triage decision
    Triage {
        /// Label of a `submit_report` step
        report: String,
        /// Decision fields
        input: TriageInput,
    },
    /// Draft an alert
    CreateAlert {
        /// Label of a `submit_report` step
        #[serde(default)]
        report: Option<String>,
        /// Alert content
        alert: NewAlert,
    },
    /// Patch an alert
    UpdateAlert {
        /// Label of a `create_alert` step
        alert: String,
        /// Fields and status to change
        patch: AlertPatch,
    },
}

/// Workflow error kind, as spelled in `expect_error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// `HiveError::NotFound`
    NotFound,
    /// `HiveError::Validation`
    Validation,
    /// `HiveError::InvalidTransition`
    InvalidTransition,
    /// `HiveError::Internal`
    Internal,
}

impl ErrorKind {
    /// Kind of a workflow error.
    pub fn of(err: &HiveError) -> Self {
        match err {
            HiveError::NotFound { .. } => ErrorKind::NotFound,
            HiveError::Validation { .. } => ErrorKind::Validation,
            HiveError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            HiveError::Internal { .. } => ErrorKind::Internal,
        }
    }
}

/// Result of replaying one step
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    /// Unique label; later steps refer to this step by it
    pub label: String,
    /// Step behaved as expected (succeeded, or failed with `expect_error`)
    pub ok: bool,
    /// Entity created or touched by a successful step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<Uuid>,
    /// Error text when the step failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Step results and final engine state after a replay
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    /// Free-form scenario name
    pub name: Option<String>,
    /// Replayed steps in order; stops early on failure
    pub steps: Vec<StepOutcome>,
    /// Every stored report
    pub reports: Vec<Report>,
    /// Every stored triage decision
    pub decisions: Vec<TriageDecision>,
    /// Every stored alert
    pub alerts: Vec<Alert>,
    /// Full audit trail, newest first
    pub audit: Vec<AuditEntry>,
}

impl ScenarioOutcome {
    /// Whether every replayed step behaved as expected.
    pub fn succeeded(&self) -> bool {
        self.steps.iter().all(|s| s.ok)
    }
}

impl Scenario {
    /// Parse a scenario, rejecting duplicate step labels.
    pub fn from_toml(text: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(text)?;
        let mut seen = std::collections::HashSet::new();
        for step in &scenario.steps {
            if !seen.insert(step.label.as_str()) {
                bail!("duplicate step label {:?}", step.label);
            }
        }
        Ok(scenario)
    }

    /// Read and parse a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }
}

/// Fresh in-memory engine for one replay.
pub fn engine<E: WorkflowEffects>(effects: E, config: WorkflowConfig) -> Result<Engine<E>> {
    let store = Arc::new(MemoryStore::new());
    let ledger = Arc::new(MemoryAuditLedger::new());
    Ok(Engine::new(effects, store, ledger, config)?)
}

#[derive(Default)]
struct Labels {
    reports: HashMap<String, ReportId>,
    alerts: HashMap<String, AlertId>,
}

impl Labels {
    fn report(&self, label: &str) -> std::result::Result<ReportId, String> {
        self.reports
            .get(label)
            .copied()
            .ok_or_else(|| format!("no submit_report step labelled {label:?}"))
    }

    fn alert(&self, label: &str) -> std::result::Result<AlertId, String> {
        self.alerts
            .get(label)
            .copied()
            .ok_or_else(|| format!("no create_alert step labelled {label:?}"))
    }
}

async fn run_step<E: WorkflowEffects>(
    engine: &Engine<E>,
    labels: &mut Labels,
    step: &Step,
) -> std::result::Result<Uuid, StepError> {
    let ctx = ActorContext {
        actor: step.actor,
        ip: step.source_ip.clone(),
    };
    match &step.action {
        StepAction::SubmitReport { report } => {
            let report = engine.submit_report(report.clone(), &step.source_ip).await?;
            labels.reports.insert(step.label.clone(), report.id);
            Ok(report.id.uuid())
        }
        StepAction::Triage { report, input } => {
            let report_id = labels.report(report).map_err(StepError::Reference)?;
            let decision = engine.decide(report_id, input.clone(), &ctx).await?;
            Ok(decision.id.uuid())
        }
        StepAction::CreateAlert { report, alert } => {
            let mut fields = alert.clone();
            if let Some(label) = report {
                fields.report_id = Some(labels.report(label).map_err(StepError::Reference)?);
            }
            let alert = engine.create_alert(fields, &ctx).await?;
            labels.alerts.insert(step.label.clone(), alert.id);
            Ok(alert.id.uuid())
        }
        StepAction::UpdateAlert { alert, patch } => {
            let alert_id = labels.alert(alert).map_err(StepError::Reference)?;
            let alert = engine.update_alert(alert_id, patch.clone(), &ctx).await?;
            Ok(alert.id.uuid())
        }
    }
}

enum StepError {
    Workflow(HiveError),
    Reference(String),
}

impl From<HiveError> for StepError {
    fn from(err: HiveError) -> Self {
        StepError::Workflow(err)
    }
}

/// Replay every step in order.
///
/// Stops at the first step that does not behave as expected unless
/// `keep_going` is set. Step failures are reported in the outcome, not as
/// an `Err`; `Err` means the final state could not be read back.
pub async fn replay<E: WorkflowEffects>(
    engine: &Engine<E>,
    scenario: &Scenario,
    keep_going: bool,
) -> Result<ScenarioOutcome> {
    let mut labels = Labels::default();
    let mut steps = Vec::with_capacity(scenario.steps.len());

    for step in &scenario.steps {
        let outcome = match (run_step(engine, &mut labels, step).await, step.expect_error) {
            (Ok(id), None) => StepOutcome {
                label: step.label.clone(),
                ok: true,
                entity_id: Some(id),
                error: None,
            },
            (Ok(id), Some(expected)) => StepOutcome {
                label: step.label.clone(),
                ok: false,
                entity_id: Some(id),
                error: Some(format!("expected {expected:?} error, step succeeded")),
            },
            (Err(StepError::Workflow(err)), expected) => StepOutcome {
                label: step.label.clone(),
                ok: expected == Some(ErrorKind::of(&err)),
                entity_id: None,
                error: Some(err.to_string()),
            },
            (Err(StepError::Reference(message)), _) => StepOutcome {
                label: step.label.clone(),
                ok: false,
                entity_id: None,
                error: Some(message),
            },
        };

        if outcome.ok {
            info!(step = %outcome.label, "step done");
        } else {
            warn!(step = %outcome.label, error = ?outcome.error, "step failed");
        }
        let stop = !outcome.ok && !keep_going;
        steps.push(outcome);
        if stop {
            break;
        }
    }

    Ok(ScenarioOutcome {
        name: scenario.name.clone(),
        steps,
        reports: collect(|page| async move {
            engine
                .list_reports(&ReportQuery::default().with_page(page))
                .await
        })
        .await?,
        decisions: collect(|page| async move {
            engine
                .list_decisions(&TriageQuery::default().with_page(page))
                .await
        })
        .await?,
        alerts: collect(|page| async move {
            engine
                .list_alerts(&AlertQuery::default().with_page(page))
                .await
        })
        .await?,
        audit: collect(|page| async move {
            engine.audit_trail(&AuditQuery::all().with_page(page)).await
        })
        .await?,
    })
}

/// Read every page of a listing.
async fn collect<T, F, Fut>(fetch: F) -> Result<Vec<T>>
where
    F: Fn(PageRequest) -> Fut,
    Fut: Future<Output = hive_core::Result<Page<T>>>,
{
    let mut items = Vec::new();
    for number in 1.. {
        let page = fetch(PageRequest::new(number, MAX_PAGE_SIZE)?).await?;
        let last = u64::from(number) >= page.total_pages();
        items.extend(page.items);
        if last {
            break;
        }
    }
    Ok(items)
}

/// Load, replay and summarize a scenario file.
pub async fn run<E: WorkflowEffects>(
    path: &Path,
    effects: E,
    config: WorkflowConfig,
    keep_going: bool,
) -> Result<ScenarioOutcome> {
    let scenario = Scenario::load(path)?;
    let engine = engine(effects, config)?;
    replay(&engine, &scenario, keep_going)
        .await
        .map_err(|e| anyhow!("replaying {}: {e}", path.display()))
}
