//! Report to published alert, as staff would drive it.

mod common;

use assert_matches::assert_matches;
use common::harness;
use hive_core::domain::{
    AlertPatch, AlertStatus, CapSeverity, Category, Certainty, NewAlert, NewReport, ReportStatus,
    Severity, TriageInput, TriageOutcome, Urgency,
};
use hive_core::HiveError;
use hive_journal::AuditQuery;
use hive_testkit::fixtures;

#[tokio::test]
async fn test_phishing_wave_scenario() {
    let h = harness();
    let reporter_ip = "198.51.100.23";
    let u = fixtures::staff(7);

    let report = h
        .engine
        .submit_report(
            NewReport::new(Category::ScamPhishing, "Campus X", "..."),
            reporter_ip,
        )
        .await
        .unwrap();
    assert_eq!(report.status, ReportStatus::Submitted);

    h.engine
        .decide(report.id, TriageInput::new(TriageOutcome::Accept, Severity::S2), &u)
        .await
        .unwrap();
    assert_eq!(h.engine.report(report.id).await.unwrap().status, ReportStatus::Triaged);
    let decisions = h.engine.decisions_for(report.id).await.unwrap();
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].severity_final, Severity::S2);

    let alert = h
        .engine
        .create_alert(
            NewAlert {
                report_id: Some(report.id),
                event: "Phishing wave".into(),
                urgency: Urgency::Expected,
                severity: CapSeverity::Moderate,
                certainty: Certainty::Likely,
                area: "Campus X".into(),
                instruction: "Do not click links".into(),
                public_message: None,
                channels: Vec::new(),
            },
            &u,
        )
        .await
        .unwrap();
    assert_eq!(alert.status, AlertStatus::Draft);
    assert!(alert.cap_xml.contains("<event>Phishing wave</event>"));

    let approved = h
        .engine
        .update_alert(alert.id, AlertPatch::status(AlertStatus::Approved), &u)
        .await
        .unwrap();
    assert_eq!(approved.approved_by, u.actor);

    let published = h
        .engine
        .update_alert(alert.id, AlertPatch::status(AlertStatus::Published), &u)
        .await
        .unwrap();
    assert!(published.published_at.is_some());
    assert_eq!(h.engine.active_alerts(10).await.unwrap(), vec![published.clone()]);

    let err = h
        .engine
        .update_alert(alert.id, AlertPatch::status(AlertStatus::Draft), &u)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        HiveError::InvalidTransition {
            from: AlertStatus::Published,
            to: AlertStatus::Draft
        }
    );
    assert!(err.is_client_error());
    assert_eq!(h.engine.alert(alert.id).await.unwrap().status, AlertStatus::Published);

    // submit, triage, create, approve, publish
    let everything = h.engine.audit_trail(&AuditQuery::all()).await.unwrap();
    assert_eq!(everything.total, 5);
    let by_u = h
        .engine
        .audit_trail(&AuditQuery::by_actor(fixtures::actor(7)))
        .await
        .unwrap();
    assert_eq!(by_u.total, 4);
}
