//! Triage decisions.

use super::report::{ReportStatus, Severity};
use super::string_enum;
use crate::hash::Hash32;
use crate::identifiers::{ActorId, DecisionId, ReportId};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

string_enum! {
    /// Outcome chosen by the triaging staff member
    TriageOutcome, field = "decision" {
        Accept => "accept",
        Reject => "reject",
        NeedsMoreInfo => "needs_more_info",
        Escalate => "escalate",
    }
}

impl TriageOutcome {
    /// Report status that follows from this outcome.
    pub fn resulting_status(self) -> ReportStatus {
        match self {
            TriageOutcome::Accept | TriageOutcome::NeedsMoreInfo => ReportStatus::Triaged,
            TriageOutcome::Escalate => ReportStatus::Escalated,
            TriageOutcome::Reject => ReportStatus::Closed,
        }
    }
}

string_enum! {
    /// Strength of the supporting evidence, none (E0) to strong (E3)
    EvidenceLevel, field = "evidence_level" {
        E0 => "E0",
        E1 => "E1",
        E2 => "E2",
        E3 => "E3",
    }
}

/// Decision fields supplied by the triaging caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageInput {
    /// Chosen outcome
    pub decision: TriageOutcome,
    /// Severity assigned by triage
    pub severity_final: Severity,
    /// Strength of the supporting evidence
    #[serde(default)]
    pub evidence_level: Option<EvidenceLevel>,
    /// Free-text reasoning
    #[serde(default)]
    pub rationale: Option<String>,
}

impl TriageInput {
    /// Input with no evidence level or rationale.
    pub fn new(decision: TriageOutcome, severity_final: Severity) -> Self {
        Self {
            decision,
            severity_final,
            evidence_level: None,
            rationale: None,
        }
    }

    /// Attach an evidence level.
    #[must_use]
    pub fn with_evidence(mut self, level: EvidenceLevel) -> Self {
        self.evidence_level = Some(level);
        self
    }

    /// Attach a rationale.
    #[must_use]
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }
}

/// An immutable triage decision. Never updated or deleted once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageDecision {
    /// Decision identifier
    pub id: DecisionId,
    /// Report the decision applies to
    pub report_id: ReportId,
    /// Triaging staff member
    pub decided_by: Option<ActorId>,
    /// Chosen outcome
    pub decision: TriageOutcome,
    /// Severity assigned by triage
    pub severity_final: Severity,
    /// Strength of the supporting evidence
    pub evidence_level: Option<EvidenceLevel>,
    /// Free-text reasoning
    pub rationale: Option<String>,
    /// Tamper-evidence hash over the canonical decision payload
    pub audit_hash: Hash32,
    /// Decision time; hashed at second precision
    pub decided_at: Timestamp,
}
