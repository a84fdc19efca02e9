//! Ready-made entity inputs.

use hive_core::domain::{
    CapSeverity, Category, Certainty, NewAlert, NewReport, Severity, Urgency,
};
use hive_core::{ActorId, ReportId};
use hive_journal::ActorContext;
use uuid::Uuid;

/// Stable actor id derived from a small number
pub fn actor(n: u128) -> ActorId {
    ActorId(Uuid::from_u128(n))
}

/// Context for an identified staff member
pub fn staff(n: u128) -> ActorContext {
    ActorContext::new(actor(n), "203.0.113.7")
}

/// Context for an anonymous public caller
pub fn public_caller() -> ActorContext {
    ActorContext::anonymous("198.51.100.23")
}

/// `scam_phishing` report on Campus X
pub fn phishing_report() -> NewReport {
    let mut report = NewReport::new(
        Category::ScamPhishing,
        "Campus X",
        "Several students received fake bursary emails asking for bank details",
    );
    report.severity_suggested = Some(Severity::S2);
    report.time_window = Some("this morning".to_string());
    report.evidence_refs = vec!["evidence/mail-1.eml".to_string(), "evidence/mail-2.eml".to_string()];
    report
}

/// Report with only the required fields
pub fn minimal_report(category: Category) -> NewReport {
    NewReport::new(category, "Main gate", "Something happened")
}

/// Draft alert for the phishing wave
pub fn phishing_alert(report_id: Option<ReportId>) -> NewAlert {
    NewAlert {
        report_id,
        event: "Phishing wave".to_string(),
        urgency: Urgency::Expected,
        severity: CapSeverity::Moderate,
        certainty: Certainty::Likely,
        area: "Campus X".to_string(),
        instruction: "Do not click links".to_string(),
        public_message: None,
        channels: vec!["sms".to_string(), "email".to_string()],
    }
}
