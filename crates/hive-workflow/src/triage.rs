//! Triage decisions and their tamper-evidence hash.
//!
//! A decision is appended, never changed. Recording one overwrites the
//! report's status with the status its outcome maps to; the decision log is
//! the only history of earlier statuses.
//!
//! # Canonical payload
//!
//! The hash is SHA-256 over the compact JSON object
//!
//! ```text
//! {"decision":"accept","evidenceLevel":"E2","rationale":"...","reportId":"<uuid>","severityFinal":"S2","timestamp":"2022-01-01T00:00:00Z"}
//! ```
//!
//! Keys appear in lexicographic order, an absent evidence level or rationale
//! is written as `""`, and the timestamp is `decided_at` truncated to whole
//! seconds in UTC. Stored hashes are only verifiable while this exact
//! rendering is kept.

use crate::audit::AuditRecorder;
use crate::effects::WorkflowEffects;
use crate::locks::EntityLocks;
use crate::query::TriageQuery;
use crate::repository::{ReportRepository, TriageRepository};
use hive_core::domain::{
    AuditAction, AuditDiff, EvidenceLevel, ObjectType, Severity, TriageDecision, TriageInput,
    TriageOutcome,
};
use hive_core::hash::{self, Hash32};
use hive_core::query::MAX_PAGE_SIZE;
use hive_core::time::canonical_seconds;
use hive_core::{DecisionId, HiveError, Page, PageRequest, ReportId, Result, Timestamp};
use hive_journal::ActorContext;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Field order here is the serialized key order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalDecision<'a> {
    decision: &'a str,
    evidence_level: &'a str,
    rationale: &'a str,
    report_id: String,
    severity_final: &'a str,
    timestamp: String,
}

/// Canonical bytes hashed for a decision.
pub fn canonical_payload(
    report_id: ReportId,
    decision: TriageOutcome,
    severity_final: Severity,
    evidence_level: Option<EvidenceLevel>,
    rationale: Option<&str>,
    decided_at: &Timestamp,
) -> Result<Vec<u8>> {
    let payload = CanonicalDecision {
        decision: decision.as_str(),
        evidence_level: evidence_level.map_or("", |level| level.as_str()),
        rationale: rationale.unwrap_or(""),
        report_id: report_id.to_string(),
        severity_final: severity_final.as_str(),
        timestamp: canonical_seconds(decided_at),
    };
    Ok(serde_json::to_vec(&payload)?)
}

/// Tamper-evidence hash of a decision's content.
pub fn decision_hash(
    report_id: ReportId,
    input: &TriageInput,
    decided_at: &Timestamp,
) -> Result<Hash32> {
    let payload = canonical_payload(
        report_id,
        input.decision,
        input.severity_final,
        input.evidence_level,
        input.rationale.as_deref(),
        decided_at,
    )?;
    Ok(hash::hash(&payload))
}

/// Hash of a stored decision's fields, as they are now.
pub fn recompute_hash(decision: &TriageDecision) -> Result<Hash32> {
    let payload = canonical_payload(
        decision.report_id,
        decision.decision,
        decision.severity_final,
        decision.evidence_level,
        decision.rationale.as_deref(),
        &decision.decided_at,
    )?;
    Ok(hash::hash(&payload))
}

/// Recompute a stored decision's hash and compare.
pub fn verify_decision(decision: &TriageDecision) -> Result<bool> {
    Ok(recompute_hash(decision)? == decision.audit_hash)
}

/// Records triage decisions; the only writer of a report's status.
#[derive(Clone)]
pub struct TriageWorkflow {
    reports: Arc<dyn ReportRepository>,
    decisions: Arc<dyn TriageRepository>,
    locks: EntityLocks,
    audit: AuditRecorder,
}

impl std::fmt::Debug for TriageWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageWorkflow")
            .field("locks", &self.locks)
            .field("audit", &self.audit)
            .finish_non_exhaustive()
    }
}

impl TriageWorkflow {
    /// Workflow over the report and decision stores.
    pub fn new(
        reports: Arc<dyn ReportRepository>,
        decisions: Arc<dyn TriageRepository>,
        locks: EntityLocks,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            reports,
            decisions,
            locks,
            audit,
        }
    }

    /// Record a decision on a report and move the report to the mapped
    /// status.
    ///
    /// # Errors
    /// * `NotFound` if the report does not exist; nothing is written
    /// * `Internal` on storage failure, or on audit failure under the strict
    ///   audit policy
    pub async fn decide<E: WorkflowEffects + ?Sized>(
        &self,
        effects: &E,
        report_id: ReportId,
        input: TriageInput,
        ctx: &ActorContext,
    ) -> Result<TriageDecision> {
        let _guard = self.locks.lock(report_id).await;

        let report = self
            .reports
            .get_report(report_id)
            .await?
            .ok_or_else(|| HiveError::not_found("report", report_id))?;

        // Blank rationale is stored as absent; hash what is stored.
        let input = TriageInput {
            rationale: input.rationale.filter(|r| !r.trim().is_empty()),
            ..input
        };

        // One clock read stamps the decision and its hash.
        let decided_at = effects.now().await?;
        let audit_hash = decision_hash(report_id, &input, &decided_at)?;
        let new_status = input.decision.resulting_status();
        debug!(%report_id, from = %report.status, to = %new_status, "derived report status");

        let decision = TriageDecision {
            id: DecisionId::from_uuid(effects.random_uuid().await),
            report_id,
            decided_by: ctx.actor,
            decision: input.decision,
            severity_final: input.severity_final,
            evidence_level: input.evidence_level,
            rationale: input.rationale,
            audit_hash,
            decided_at,
        };

        self.decisions
            .record_decision(decision.clone(), new_status, decided_at)
            .await?;
        info!(
            %report_id,
            decision_id = %decision.id,
            outcome = %decision.decision,
            status = %new_status,
            "triage decision recorded"
        );

        let diff = AuditDiff::new()
            .with("decision", decision.decision.as_str())
            .with("severityFinal", decision.severity_final.as_str())
            .with("auditHash", decision.audit_hash.to_hex());
        self.audit
            .record(
                effects,
                ctx,
                AuditAction::Triage,
                ObjectType::Report,
                report_id.uuid(),
                diff,
                decided_at,
            )
            .await?;

        Ok(decision)
    }

    /// Load a decision; `NotFound` if absent.
    pub async fn get(&self, id: DecisionId) -> Result<TriageDecision> {
        self.decisions
            .get_decision(id)
            .await?
            .ok_or_else(|| HiveError::not_found("triage_decision", id))
    }

    /// Filtered page of decisions, newest first.
    pub async fn list(&self, query: &TriageQuery) -> Result<Page<TriageDecision>> {
        query.validate()?;
        self.decisions.list_decisions(query).await
    }

    /// Every decision on a report, newest first.
    ///
    /// Holds the report's lock while paging so no decision lands between
    /// pages.
    pub async fn decisions_for(&self, report_id: ReportId) -> Result<Vec<TriageDecision>> {
        let _guard = self.locks.lock(report_id).await;

        let mut decisions = Vec::new();
        for number in 1.. {
            let query = TriageQuery::for_report(report_id)
                .with_page(PageRequest::new(number, MAX_PAGE_SIZE)?);
            let page = self.decisions.list_decisions(&query).await?;
            let last = u64::from(number) >= page.total_pages();
            decisions.extend(page.items);
            if last {
                break;
            }
        }
        Ok(decisions)
    }

    /// The decision currently determining the report's status.
    pub async fn latest_for(&self, report_id: ReportId) -> Result<Option<TriageDecision>> {
        let query = TriageQuery::for_report(report_id).with_page(PageRequest::new(1, 1)?);
        Ok(self.decisions.list_decisions(&query).await?.items.into_iter().next())
    }

    /// Recompute and compare a stored decision's hash.
    pub fn verify(&self, decision: &TriageDecision) -> Result<bool> {
        verify_decision(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::PhysicalTime;
    use uuid::Uuid;

    fn at(ms: u64) -> Timestamp {
        PhysicalTime::from_millis(ms).to_timestamp().unwrap()
    }

    fn report() -> ReportId {
        ReportId(Uuid::from_u128(0x1234))
    }

    #[test]
    fn test_canonical_payload_layout() {
        let input = TriageInput::new(TriageOutcome::Accept, Severity::S2);
        let payload = canonical_payload(
            report(),
            input.decision,
            input.severity_final,
            None,
            None,
            &at(1_640_995_200_999),
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(payload).unwrap(),
            r#"{"decision":"accept","evidenceLevel":"","rationale":"","reportId":"00000000-0000-0000-0000-000000001234","severityFinal":"S2","timestamp":"2022-01-01T00:00:00Z"}"#
        );
    }

    #[test]
    fn test_hash_is_sha256_of_payload() {
        let input = TriageInput::new(TriageOutcome::Escalate, Severity::S4)
            .with_evidence(EvidenceLevel::E3)
            .with_rationale("multiple corroborating reports");
        let ts = at(1_700_000_000_000);
        let payload = canonical_payload(
            report(),
            input.decision,
            input.severity_final,
            input.evidence_level,
            input.rationale.as_deref(),
            &ts,
        )
        .unwrap();
        assert_eq!(decision_hash(report(), &input, &ts).unwrap(), hash::hash(&payload));
    }

    #[test]
    fn test_hash_depends_on_timestamp_seconds() {
        let input = TriageInput::new(TriageOutcome::Accept, Severity::S2);
        let a = decision_hash(report(), &input, &at(1_640_995_200_000)).unwrap();
        let same_second = decision_hash(report(), &input, &at(1_640_995_200_500)).unwrap();
        let next_second = decision_hash(report(), &input, &at(1_640_995_201_000)).unwrap();
        assert_eq!(a, same_second);
        assert_ne!(a, next_second);
    }

    #[test]
    fn test_verify_detects_tampering() {
        let input = TriageInput::new(TriageOutcome::Reject, Severity::S0).with_rationale("duplicate");
        let ts = at(1_640_995_200_000);
        let decision = TriageDecision {
            id: DecisionId(Uuid::from_u128(1)),
            report_id: report(),
            decided_by: None,
            decision: input.decision,
            severity_final: input.severity_final,
            evidence_level: None,
            rationale: input.rationale.clone(),
            audit_hash: decision_hash(report(), &input, &ts).unwrap(),
            decided_at: ts,
        };
        assert!(verify_decision(&decision).unwrap());

        let tampered = TriageDecision {
            severity_final: Severity::S3,
            ..decision.clone()
        };
        assert!(!verify_decision(&tampered).unwrap());
    }
}
