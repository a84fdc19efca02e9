//! Shared engine setup for workflow integration tests.

#![allow(dead_code)]

use hive_core::domain::{AlertPatch, AlertStatus};
use hive_core::AlertId;
use hive_journal::{AuditLedger, AuditQuery};
use hive_store::{MemoryAuditLedger, MemoryStore};
use hive_testkit::{fixtures, MockEffects};
use hive_workflow::{Engine, WorkflowConfig};
use std::sync::Arc;

pub struct Harness {
    pub engine: Engine<MockEffects>,
    pub effects: MockEffects,
    pub store: Arc<MemoryStore>,
    pub ledger: Arc<MemoryAuditLedger>,
}

pub fn harness() -> Harness {
    harness_with(WorkflowConfig::default())
}

pub fn harness_with(config: WorkflowConfig) -> Harness {
    let effects = MockEffects::deterministic();
    let store = Arc::new(MemoryStore::new());
    let ledger = Arc::new(MemoryAuditLedger::new());
    let engine = Engine::new(effects.clone(), store.clone(), ledger.clone(), config).unwrap();
    Harness {
        engine,
        effects,
        store,
        ledger,
    }
}

/// Engine whose audit appends always fail
pub fn harness_with_ledger(
    ledger: Arc<dyn AuditLedger>,
    config: WorkflowConfig,
) -> (Engine<MockEffects>, MockEffects, Arc<MemoryStore>) {
    let effects = MockEffects::deterministic();
    let store = Arc::new(MemoryStore::new());
    let engine = Engine::new(effects.clone(), store.clone(), ledger, config).unwrap();
    (engine, effects, store)
}

/// Drive a fresh alert into `status` through allowed transitions.
pub async fn alert_in(engine: &Engine<MockEffects>, status: AlertStatus) -> AlertId {
    let staff = fixtures::staff(1);
    let alert = engine
        .create_alert(fixtures::phishing_alert(None), &staff)
        .await
        .unwrap();
    let path: &[AlertStatus] = match status {
        AlertStatus::Draft => &[],
        AlertStatus::Approved => &[AlertStatus::Approved],
        AlertStatus::Published => &[AlertStatus::Approved, AlertStatus::Published],
        AlertStatus::Withdrawn => &[AlertStatus::Withdrawn],
    };
    for step in path {
        engine
            .update_alert(alert.id, AlertPatch::status(*step), &staff)
            .await
            .unwrap();
    }
    alert.id
}

/// Number of ledger entries, any object
pub async fn audit_count(ledger: &MemoryAuditLedger) -> u64 {
    ledger.query(&AuditQuery::all()).await.unwrap().total
}
