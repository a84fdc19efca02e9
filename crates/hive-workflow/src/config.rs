//! Workflow configuration.

use hive_cap::DEFAULT_SENDER;
use hive_core::{HiveError, Result};
use serde::{Deserialize, Serialize};

/// What a failed audit append means for the operation that triggered it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditPolicy {
    /// Log a warning and report the operation as successful
    #[default]
    BestEffort,
    /// Report `Internal` to the caller. The primary write has already been
    /// committed and is not rolled back.
    Strict,
}

/// Settings shared by the workflow components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// `sender` written into every CAP document
    pub cap_sender: String,
    /// Handling of failed audit appends
    pub audit_policy: AuditPolicy,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            cap_sender: DEFAULT_SENDER.to_string(),
            audit_policy: AuditPolicy::default(),
        }
    }
}

impl WorkflowConfig {
    /// Override the CAP sender.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.cap_sender = sender.into();
        self
    }

    /// Override the audit policy.
    #[must_use]
    pub fn with_audit_policy(mut self, policy: AuditPolicy) -> Self {
        self.audit_policy = policy;
        self
    }

    /// Reject a blank sender.
    pub fn validate(&self) -> Result<()> {
        if self.cap_sender.trim().is_empty() {
            return Err(HiveError::validation("cap_sender", "required"));
        }
        Ok(())
    }
}
