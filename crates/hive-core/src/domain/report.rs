//! Community incident reports.

use super::{limit_text, require_text, string_enum};
use crate::errors::Result;
use crate::identifiers::ReportId;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// Maximum length of `area_hint`
pub const MAX_AREA_HINT_CHARS: usize = 500;
/// Maximum length of `time_window`
pub const MAX_TIME_WINDOW_CHARS: usize = 100;
/// Maximum length of `reporter_contact_ref`
pub const MAX_CONTACT_REF_CHARS: usize = 255;

string_enum! {
    /// What kind of incident was reported
    Category, field = "category" {
        SuspiciousItem => "suspicious_item",
        SuspiciousPerson => "suspicious_person",
        HarassmentStalking => "harassment_stalking",
        ScamPhishing => "scam_phishing",
        MisinformationPanic => "misinformation_panic",
        CrowdDisorder => "crowd_disorder",
        InfrastructureHazard => "infrastructure_hazard",
        Other => "other",
    }
}

string_enum! {
    /// Ordinal incident severity, informational (S0) to critical (S4)
    Severity, field = "severity" {
        /// Informational
        S0 => "S0",
        /// Low risk
        S1 => "S1",
        /// Moderate
        S2 => "S2",
        /// High
        S3 => "S3",
        /// Critical
        S4 => "S4",
    }
}

string_enum! {
    /// Report handling state. Written only by triage.
    ReportStatus, field = "status" {
        Submitted => "submitted",
        UnderReview => "under_review",
        Triaged => "triaged",
        Escalated => "escalated",
        Closed => "closed",
        Spam => "spam",
    }
}

/// Fields supplied by a reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReport {
    /// Incident category
    pub category: Category,
    /// Reporter's severity estimate
    #[serde(default)]
    pub severity_suggested: Option<Severity>,
    /// Where it happened, as described by the reporter
    pub area_hint: String,
    /// When it happened, free text
    #[serde(default)]
    pub time_window: Option<String>,
    /// What happened
    pub description: String,
    /// Evidence references in submission order
    #[serde(default)]
    pub evidence_refs: Vec<String>,
    /// Opaque reference for contacting the reporter
    #[serde(default)]
    pub reporter_contact_ref: Option<String>,
}

impl NewReport {
    /// Minimal report with the required fields.
    pub fn new(category: Category, area_hint: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            category,
            severity_suggested: None,
            area_hint: area_hint.into(),
            time_window: None,
            description: description.into(),
            evidence_refs: Vec::new(),
            reporter_contact_ref: None,
        }
    }

    /// Check required fields and length limits.
    pub fn validate(&self) -> Result<()> {
        require_text("area_hint", &self.area_hint, Some(MAX_AREA_HINT_CHARS))?;
        require_text("description", &self.description, None)?;
        if let Some(window) = &self.time_window {
            limit_text("time_window", window, Some(MAX_TIME_WINDOW_CHARS))?;
        }
        if let Some(contact) = &self.reporter_contact_ref {
            limit_text("reporter_contact_ref", contact, Some(MAX_CONTACT_REF_CHARS))?;
        }
        Ok(())
    }
}

/// A submitted incident report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Report identifier
    pub id: ReportId,
    /// Incident category
    pub category: Category,
    /// Reporter's severity estimate
    pub severity_suggested: Option<Severity>,
    /// Where it happened, as described by the reporter
    pub area_hint: String,
    /// When it happened, free text
    pub time_window: Option<String>,
    /// What happened
    pub description: String,
    /// Evidence references in submission order
    pub evidence_refs: Vec<String>,
    /// Opaque reference for contacting the reporter
    pub reporter_contact_ref: Option<String>,
    /// Handling state; written only by triage
    pub status: ReportStatus,
    /// Submission time
    pub created_at: Timestamp,
    /// Last status change
    pub updated_at: Timestamp,
}

impl Report {
    /// Build a freshly submitted report. Blank optional text is dropped.
    pub fn submitted(id: ReportId, fields: NewReport, now: Timestamp) -> Self {
        Self {
            id,
            category: fields.category,
            severity_suggested: fields.severity_suggested,
            area_hint: fields.area_hint,
            time_window: fields.time_window.filter(|w| !w.trim().is_empty()),
            description: fields.description,
            evidence_refs: fields.evidence_refs,
            reporter_contact_ref: fields.reporter_contact_ref.filter(|c| !c.trim().is_empty()),
            status: ReportStatus::Submitted,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HiveError;
    use assert_matches::assert_matches;

    #[test]
    fn test_category_spellings() {
        assert_eq!(Category::ALL.len(), 8);
        assert_eq!("scam_phishing".parse::<Category>().unwrap(), Category::ScamPhishing);
        assert_matches!(
            "phishing".parse::<Category>(),
            Err(HiveError::Validation { ref field, .. }) if field == "category"
        );
    }

    #[test]
    fn test_validation_rejects_missing_required_fields() {
        let blank_area = NewReport::new(Category::Other, "", "something happened");
        assert_matches!(
            blank_area.validate(),
            Err(HiveError::Validation { ref field, .. }) if field == "area_hint"
        );

        let blank_description = NewReport::new(Category::Other, "Campus X", " ");
        assert_matches!(
            blank_description.validate(),
            Err(HiveError::Validation { ref field, .. }) if field == "description"
        );

        let mut long_window = NewReport::new(Category::Other, "Campus X", "desc");
        long_window.time_window = Some("x".repeat(MAX_TIME_WINDOW_CHARS + 1));
        assert!(long_window.validate().is_err());
    }

    #[test]
    fn test_submitted_report_starts_submitted() {
        let mut fields = NewReport::new(Category::ScamPhishing, "Campus X", "odd emails");
        fields.evidence_refs = vec!["b".into(), "a".into()];
        fields.time_window = Some("  ".into());
        let now = chrono::DateTime::from_timestamp(0, 0).unwrap();
        let report = Report::submitted(ReportId(uuid::Uuid::nil()), fields, now);

        assert_eq!(report.status, ReportStatus::Submitted);
        assert_eq!(report.evidence_refs, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(report.time_window, None);
        assert_eq!(report.created_at, report.updated_at);
    }
}
