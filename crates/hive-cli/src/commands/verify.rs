//! `hive verify`: recompute a stored triage decision's hash.

use anyhow::{Context, Result};
use hive_core::domain::TriageDecision;
use hive_core::Hash32;
use hive_workflow::triage::recompute_hash;
use serde::Serialize;
use std::path::Path;

/// Outcome of recomputing one decision's hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    /// Decision that was checked
    pub decision_id: String,
    /// Hash stored with the decision
    pub stored: Hash32,
    /// Hash recomputed from the stored fields
    pub computed: Hash32,
    /// `stored == computed`
    pub valid: bool,
}

/// Verify a decision given as JSON.
pub fn verify_json(json: &str) -> Result<Verification> {
    let decision: TriageDecision =
        serde_json::from_str(json).context("decoding triage decision JSON")?;
    let computed = recompute_hash(&decision)?;
    Ok(Verification {
        decision_id: decision.id.to_string(),
        stored: decision.audit_hash,
        computed,
        valid: computed == decision.audit_hash,
    })
}

/// Verify the decision stored in a JSON file.
pub fn run(path: &Path) -> Result<Verification> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading decision {}", path.display()))?;
    verify_json(&json)
}
