//! The alert publication state machine against a live engine.

mod common;

use assert_matches::assert_matches;
use common::{alert_in, harness};
use hive_core::domain::{AlertPatch, AlertStatus, AuditAction, ObjectType};
use hive_core::HiveError;
use hive_journal::AuditQuery;
use hive_testkit::fixtures;
use hive_testkit::strategies::arb_status_pair;
use proptest::prelude::*;

#[tokio::test]
async fn test_every_pair_against_transition_table() {
    for &from in AlertStatus::ALL {
        for &to in AlertStatus::ALL {
            if from == to {
                continue;
            }
            let h = harness();
            let id = alert_in(&h.engine, from).await;
            let result = h
                .engine
                .update_alert(id, AlertPatch::status(to), &fixtures::staff(2))
                .await;

            if from.can_transition_to(to) {
                let alert = result.unwrap();
                assert_eq!(alert.status, to, "{from} -> {to}");
            } else {
                assert_matches!(
                    result,
                    Err(HiveError::InvalidTransition { from: f, to: t }) if f == from && t == to,
                    "{from} -> {to}"
                );
                assert_eq!(h.engine.alert(id).await.unwrap().status, from);
            }
        }
    }
}

#[tokio::test]
async fn test_rejected_transition_leaves_alert_untouched() {
    let h = harness();
    let id = alert_in(&h.engine, AlertStatus::Published).await;
    let before = h.engine.alert(id).await.unwrap();
    let audit_before = common::audit_count(&h.ledger).await;

    let patch = AlertPatch {
        status: Some(AlertStatus::Draft),
        event: Some("Changed".into()),
        ..AlertPatch::default()
    };
    let err = h
        .engine
        .update_alert(id, patch, &fixtures::staff(1))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        HiveError::invalid_transition(AlertStatus::Published, AlertStatus::Draft)
    );
    assert_eq!(h.engine.alert(id).await.unwrap(), before);
    assert_eq!(common::audit_count(&h.ledger).await, audit_before);
}

#[tokio::test]
async fn test_conflicting_concurrent_updates_are_serialized() {
    let h = harness();
    let id = alert_in(&h.engine, AlertStatus::Approved).await;
    let staff = fixtures::staff(3);

    let (publish, redraft) = tokio::join!(
        h.engine.update_alert(id, AlertPatch::status(AlertStatus::Published), &staff),
        h.engine.update_alert(id, AlertPatch::status(AlertStatus::Draft), &staff),
    );

    let (winner, action, err) = match (publish, redraft) {
        (Ok(alert), Err(err)) => (alert, AuditAction::Publish, err),
        (Err(err), Ok(alert)) => (alert, AuditAction::Update, err),
        other => panic!("expected exactly one update to succeed, got {other:?}"),
    };
    assert_matches!(err, HiveError::InvalidTransition { from, .. } if from == winner.status);

    let stored = h.engine.alert(id).await.unwrap();
    assert_eq!(stored, winner);

    // create, approve, then the winning update
    let trail = h
        .engine
        .audit_trail(&AuditQuery::for_object(ObjectType::Alert, id))
        .await
        .unwrap();
    assert_eq!(trail.total, 3);
    assert_eq!(trail.items[0].action, action);
    assert_eq!(trail.items[0].actor, Some(fixtures::actor(3)));
}

#[tokio::test]
async fn test_transition_side_effects_and_audit_actions() {
    let h = harness();
    let author = fixtures::staff(1);
    let approver = fixtures::staff(2);
    let alert = h
        .engine
        .create_alert(fixtures::phishing_alert(None), &author)
        .await
        .unwrap();
    assert_eq!(alert.status, AlertStatus::Draft);
    assert_eq!(alert.approved_by, None);

    let approved = h
        .engine
        .update_alert(alert.id, AlertPatch::status(AlertStatus::Approved), &approver)
        .await
        .unwrap();
    assert_eq!(approved.approved_by, approver.actor);
    assert_eq!(approved.published_at, None);

    h.effects.advance_secs(60);
    let published = h
        .engine
        .update_alert(alert.id, AlertPatch::status(AlertStatus::Published), &approver)
        .await
        .unwrap();
    let first_publish = published.published_at.unwrap();
    assert_eq!(first_publish, h.effects.timestamp());

    // withdraw -> draft -> approved -> published refreshes the publish time
    for step in [
        AlertStatus::Withdrawn,
        AlertStatus::Draft,
        AlertStatus::Approved,
    ] {
        h.engine
            .update_alert(alert.id, AlertPatch::status(step), &approver)
            .await
            .unwrap();
    }
    h.effects.advance_secs(60);
    let republished = h
        .engine
        .update_alert(alert.id, AlertPatch::status(AlertStatus::Published), &approver)
        .await
        .unwrap();
    assert!(republished.published_at.unwrap() > first_publish);

    let trail = h
        .engine
        .audit_trail(&AuditQuery::for_object(ObjectType::Alert, alert.id))
        .await
        .unwrap();
    let actions: Vec<AuditAction> = trail.items.iter().rev().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::Create,
            AuditAction::Approve,
            AuditAction::Publish,
            AuditAction::Withdraw,
            AuditAction::Update,
            AuditAction::Approve,
            AuditAction::Publish,
        ]
    );
    let withdraw = &trail.items[3];
    let status = withdraw.diff.get("status").unwrap();
    assert_eq!(
        serde_json::to_value(status).unwrap(),
        serde_json::json!({"from": "published", "to": "withdrawn"})
    );
}

#[tokio::test]
async fn test_same_status_is_a_plain_update() {
    let h = harness();
    let id = alert_in(&h.engine, AlertStatus::Approved).await;
    let before = h.engine.alert(id).await.unwrap();

    let after = h
        .engine
        .update_alert(id, AlertPatch::status(AlertStatus::Approved), &fixtures::staff(9))
        .await
        .unwrap();
    assert_eq!(after.status, AlertStatus::Approved);
    assert_eq!(after.approved_by, before.approved_by);

    let latest = h
        .engine
        .audit_trail(&AuditQuery::for_object(ObjectType::Alert, id))
        .await
        .unwrap()
        .items
        .remove(0);
    assert_eq!(latest.action, AuditAction::Update);
    assert!(latest.diff.get("status").is_none());
}

#[tokio::test]
async fn test_content_update_regenerates_cap() {
    let h = harness();
    let id = alert_in(&h.engine, AlertStatus::Draft).await;
    let before = h.engine.alert(id).await.unwrap();

    let patch = AlertPatch {
        event: Some("Phishing & vishing wave".into()),
        area: Some("Campus Y".into()),
        ..AlertPatch::default()
    };
    let after = h
        .engine
        .update_alert(id, patch, &fixtures::staff(1))
        .await
        .unwrap();

    assert_eq!(after.event, "Phishing & vishing wave");
    assert_eq!(after.instruction, before.instruction);
    assert_ne!(after.cap_xml, before.cap_xml);
    assert!(after.cap_xml.contains("<event>Phishing &amp; vishing wave</event>"));
    assert!(after.cap_xml.contains("<areaDesc>Campus Y</areaDesc>"));

    let latest = h
        .engine
        .audit_trail(&AuditQuery::for_object(ObjectType::Alert, id))
        .await
        .unwrap()
        .items
        .remove(0);
    assert_eq!(
        serde_json::to_value(&latest.diff).unwrap(),
        serde_json::json!({"fields": ["event", "area"]})
    );
}

#[tokio::test]
async fn test_update_errors() {
    let h = harness();
    let missing = hive_core::AlertId(uuid::Uuid::from_u128(404));
    assert_matches!(
        h.engine
            .update_alert(missing, AlertPatch::status(AlertStatus::Approved), &fixtures::staff(1))
            .await,
        Err(HiveError::NotFound { .. })
    );

    let id = alert_in(&h.engine, AlertStatus::Draft).await;
    let blank_area = AlertPatch {
        area: Some(String::new()),
        ..AlertPatch::default()
    };
    assert_matches!(
        h.engine.update_alert(id, blank_area, &fixtures::staff(1)).await,
        Err(HiveError::Validation { ref field, .. }) if field == "area"
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_status_moves_only_along_the_table((from, to) in arb_status_pair()) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let h = harness();
            let id = alert_in(&h.engine, from).await;
            let result = h
                .engine
                .update_alert(id, AlertPatch::status(to), &fixtures::staff(3))
                .await;
            let stored = h.engine.alert(id).await.unwrap().status;

            if from == to || from.can_transition_to(to) {
                prop_assert!(result.is_ok());
                prop_assert_eq!(stored, to);
            } else {
                prop_assert!(
                    matches!(result, Err(HiveError::InvalidTransition { .. })),
                    "expected rejection for {} -> {}", from, to
                );
                prop_assert_eq!(stored, from);
            }
            Ok(())
        })?;
    }
}
