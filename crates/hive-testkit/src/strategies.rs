//! Property test strategies for Hive types

use hive_core::domain::{
    AlertStatus, CapSeverity, Certainty, EvidenceLevel, Severity, TriageOutcome, Urgency,
};
use proptest::prelude::*;
use proptest::sample::select;

// Re-export proptest for convenience
pub use proptest;

/// Any alert status
pub fn arb_alert_status() -> impl Strategy<Value = AlertStatus> {
    select(AlertStatus::ALL)
}

/// Any ordered pair of alert statuses, allowed or not
pub fn arb_status_pair() -> impl Strategy<Value = (AlertStatus, AlertStatus)> {
    (arb_alert_status(), arb_alert_status())
}

/// Any triage outcome
pub fn arb_triage_outcome() -> impl Strategy<Value = TriageOutcome> {
    select(TriageOutcome::ALL)
}

/// Any severity S0-S4
pub fn arb_severity() -> impl Strategy<Value = Severity> {
    select(Severity::ALL)
}

/// Any evidence level, or none
pub fn arb_evidence_level() -> impl Strategy<Value = Option<EvidenceLevel>> {
    proptest::option::of(select(EvidenceLevel::ALL))
}

/// Any CAP urgency
pub fn arb_urgency() -> impl Strategy<Value = Urgency> {
    select(Urgency::ALL)
}

/// Any CAP severity
pub fn arb_cap_severity() -> impl Strategy<Value = CapSeverity> {
    select(CapSeverity::ALL)
}

/// Any CAP certainty
pub fn arb_certainty() -> impl Strategy<Value = Certainty> {
    select(Certainty::ALL)
}

/// Short printable text, never blank
pub fn arb_text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 .,!?-]{0,40}"
}
