//! `hive.toml` loading.
//!
//! ```toml
//! [workflow]
//! cap_sender = "alerts@campus.example"
//! audit_policy = "best_effort"
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{Context, Result};
use hive_workflow::WorkflowConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding `workflow.cap_sender`
pub const SENDER_ENV: &str = "HIVE_CAP_SENDER";

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used unless `--verbose` is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Contents of `hive.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HiveConfig {
    /// `[workflow]` section
    pub workflow: WorkflowConfig,
    /// `[logging]` section
    pub logging: LoggingConfig,
}

impl HiveConfig {
    /// Load from `path`, falling back to defaults when the file does not
    /// exist, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))?
        } else {
            Self::default()
        };
        let config = config.with_env(|key| std::env::var(key).ok());
        config.workflow.validate()?;
        Ok(config)
    }

    /// Parse config text without environment overrides.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Apply overrides from an environment lookup.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(sender) = lookup(SENDER_ENV).filter(|s| !s.trim().is_empty()) {
            self.workflow.cap_sender = sender;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_workflow::AuditPolicy;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = HiveConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.workflow.audit_policy, AuditPolicy::BestEffort);
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[workflow]\naudit_policy = \"strict\"").unwrap();
        let config = HiveConfig::load(file.path()).unwrap();
        assert_eq!(config.workflow.audit_policy, AuditPolicy::Strict);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_env_override() {
        let config = HiveConfig::from_toml("[workflow]\ncap_sender = \"file@example.org\"\n")
            .unwrap()
            .with_env(|key| (key == SENDER_ENV).then(|| "env@example.org".to_string()));
        assert_eq!(config.workflow.cap_sender, "env@example.org");

        let untouched = HiveConfig::default().with_env(|_| Some("  ".to_string()));
        assert_eq!(untouched.workflow.cap_sender, "the-hive@example.invalid");
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!(HiveConfig::from_toml("[workflow]\naudit_policy = \"sometimes\"\n").is_err());
    }
}
