//! `hive cap`: print a CAP 1.2 document for the given content.

use anyhow::Result;
use clap::Args;
use hive_cap::{CapContent, CapEncoder};
use hive_core::domain::{CapSeverity, Certainty, NewAlert, Urgency};
use hive_workflow::{WorkflowConfig, WorkflowEffects};

/// Content flags for `hive cap`
#[derive(Debug, Clone, Args)]
pub struct CapArgs {
    /// Event headline
    #[arg(long)]
    pub event: String,

    /// Immediate | Expected | Future | Past | Unknown
    #[arg(long)]
    pub urgency: String,

    /// Extreme | Severe | Moderate | Minor | Unknown
    #[arg(long)]
    pub severity: String,

    /// Observed | Likely | Possible | Unlikely | Unknown
    #[arg(long)]
    pub certainty: String,

    /// Affected area description
    #[arg(long)]
    pub area: String,

    /// What the public should do
    #[arg(long)]
    pub instruction: String,

    /// Sender address (defaults to the configured one)
    #[arg(long)]
    pub sender: Option<String>,
}

impl CapArgs {
    /// Parse and check the content the same way alert drafting does.
    pub fn to_alert(&self) -> Result<NewAlert> {
        let alert = NewAlert {
            report_id: None,
            event: self.event.clone(),
            urgency: self.urgency.parse::<Urgency>()?,
            severity: self.severity.parse::<CapSeverity>()?,
            certainty: self.certainty.parse::<Certainty>()?,
            area: self.area.clone(),
            instruction: self.instruction.clone(),
            public_message: None,
            channels: Vec::new(),
        };
        alert.validate()?;
        Ok(alert)
    }
}

/// Encode the document.
pub async fn run<E: WorkflowEffects>(
    args: &CapArgs,
    config: &WorkflowConfig,
    effects: &E,
) -> Result<String> {
    let alert = args.to_alert()?;
    let sender = args.sender.clone().unwrap_or_else(|| config.cap_sender.clone());
    let encoder = CapEncoder::new(sender);
    let content = CapContent {
        event: &alert.event,
        urgency: alert.urgency.as_str(),
        severity: alert.severity.as_str(),
        certainty: alert.certainty.as_str(),
        area: &alert.area,
        instruction: &alert.instruction,
    };
    Ok(encoder.encode(effects, &content).await?)
}
