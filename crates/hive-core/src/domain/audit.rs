//! Audit vocabulary and structured diff payloads.
//!
//! Diffs are ordered key/value maps over a small closed set of leaf kinds,
//! so serializing the same diff always yields the same bytes.

use super::string_enum;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

string_enum! {
    /// Kind of state-changing action recorded in the ledger
    AuditAction, field = "action" {
        Create => "create",
        Update => "update",
        Delete => "delete",
        Triage => "triage",
        Approve => "approve",
        Publish => "publish",
        Withdraw => "withdraw",
        Login => "login",
        Logout => "logout",
    }
}

string_enum! {
    /// Kind of object an audit entry refers to
    ObjectType, field = "object_type" {
        Report => "report",
        TriageDecision => "triage_decision",
        Alert => "alert",
        TrainingEvent => "training_event",
        User => "user",
        ApiKey => "api_key",
    }
}

/// Leaf or nested value inside an audit diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuditValue {
    Bool(bool),
    Number(i64),
    String(String),
    List(Vec<AuditValue>),
    Map(AuditDiff),
}

impl From<&str> for AuditValue {
    fn from(value: &str) -> Self {
        AuditValue::String(value.to_string())
    }
}

impl From<String> for AuditValue {
    fn from(value: String) -> Self {
        AuditValue::String(value)
    }
}

impl From<bool> for AuditValue {
    fn from(value: bool) -> Self {
        AuditValue::Bool(value)
    }
}

impl From<i64> for AuditValue {
    fn from(value: i64) -> Self {
        AuditValue::Number(value)
    }
}

impl From<AuditDiff> for AuditValue {
    fn from(value: AuditDiff) -> Self {
        AuditValue::Map(value)
    }
}

impl<T: Into<AuditValue>> From<Vec<T>> for AuditValue {
    fn from(values: Vec<T>) -> Self {
        AuditValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Insertion-ordered summary of what an action changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditDiff(IndexMap<String, AuditValue>);

impl AuditDiff {
    /// Empty diff
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AuditValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a key, keeping its original position on replace
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AuditValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Value at `key`
    pub fn get(&self, key: &str) -> Option<&AuditValue> {
        self.0.get(key)
    }

    /// String value at `key`, if it is one
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(AuditValue::String(value)) => Some(value),
            _ => None,
        }
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AuditValue)> {
        self.0.iter()
    }

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the diff has no keys
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
